//! URL helper functions

use percent_encoding::{percent_decode, percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::borrow::Cow;

/// Characters escaped when a page title is placed in a link
const TITLE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate the URL of an action on a page
///
/// # Examples
/// ```ignore
/// action_url("view", "Home") // -> "/view/Home"
/// ```
pub fn action_url(action: &str, title: &str) -> String {
    format!("/{}/{}", action, encode_title(title))
}

/// Name of the file backing image slot `index` of a page
pub fn image_file_name(title: &str, index: u8) -> String {
    format!("{}Image{}.jpg", title, index)
}

/// Generate a cache-busting image URL
///
/// # Examples
/// ```ignore
/// image_url("Home", 3, "2024_01_15_10_30_05") // -> "/images/HomeImage3.jpg?2024_01_15_10_30_05"
/// ```
pub fn image_url(title: &str, index: u8, stamp: &str) -> String {
    format!("/images/{}?{}", image_file_name(title, index), stamp)
}

/// Percent-encode a title for use in a URL path
pub fn encode_title(title: &str) -> String {
    utf8_percent_encode(title, TITLE_SET).to_string()
}

/// Percent-decode a request path before routing
pub fn decode_path(path: &str) -> Cow<'_, str> {
    percent_decode_str(path).decode_utf8_lossy()
}

/// First value of `key` in `application/x-www-form-urlencoded` data, as raw bytes
///
/// Values are not required to be UTF-8: `%FF` decodes to the byte `0xff`.
pub fn form_value(data: &[u8], key: &str) -> Option<Vec<u8>> {
    data.split(|&b| b == b'&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (name, value) = match pair.iter().position(|&b| b == b'=') {
                Some(i) => (&pair[..i], &pair[i + 1..]),
                None => (pair, &[][..]),
            };
            (form_decode(name) == key.as_bytes()).then(|| form_decode(value))
        })
}

fn form_decode(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    percent_decode(&spaced).collect()
}
