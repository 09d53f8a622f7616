//! Helper functions shared by the store, the templates and the server
//!
//! URL synthesis, HTML escaping and timestamp formatting.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
