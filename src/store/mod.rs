//! Page persistence
//!
//! Every page is one `<title>.txt` file holding the raw body. Nothing is
//! cached; each call goes to the filesystem.

mod page;
mod page_store;

pub use page::{Page, IMAGE_SLOTS};
pub use page_store::PageStore;
