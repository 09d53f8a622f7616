//! Configuration module

mod wiki;

pub use wiki::WikiConfig;
