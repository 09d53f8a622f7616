//! HTML helper functions

use super::url::action_url;

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Generate a bracketed table-of-contents entry linking to a page
///
/// # Examples
/// ```ignore
/// toc_entry("Home") // -> <p>[<a href="/view/Home">Home</a>]</p>
/// ```
pub fn toc_entry(title: &str) -> String {
    format!(
        r#"<p>[<a href="{}">{}</a>]</p>"#,
        html_escape(&action_url("view", title)),
        html_escape(title)
    )
}
