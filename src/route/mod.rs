//! Request path routing
//!
//! A request path is matched against a single suffix pattern of the form
//! `/<action>/<title>(/<digit>)*`. [`PathMatch`] exposes the raw captures and
//! [`Route`] turns them into the handler the dispatcher should run.

mod matcher;
mod parse;

pub use matcher::PathMatch;
pub use parse::Route;
