//! Suffix path matcher

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Compiled once and shared read-only by every request.
    ///
    /// Only the end of the path is anchored, so any scheme, host or leading
    /// segments in front of the trailing `/action/title` tail are ignored.
    static ref VALID_PATH: Regex =
        Regex::new(r"/((edit|save|view|toc|delete|upload)/(([a-zA-Z0-9]+)(/([0-9]))*)*)*$")
            .expect("valid path pattern");
}

/// Captures of a successful path match
///
/// Groups that did not participate in the match are empty strings. A path
/// ending in a bare `/` matches with every group empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMatch {
    /// The whole matched text, including the leading `/`
    pub full: String,
    /// Group 1: the `action/title...` tail without its leading `/`
    pub tail: String,
    /// Group 2: the action keyword
    pub action: String,
    /// Group 3: the title followed by every `/digit` group
    pub title_with_subpath: String,
    /// Group 4: the alphanumeric title alone
    pub title: String,
    /// Group 5: the last `/digit` group, slash included
    pub subpath_tail: String,
    /// Group 6: the last digit, used as the image index
    pub image_index: String,
}

impl PathMatch {
    /// Match a request path, returning `None` when no suffix of it fits
    pub fn find(path: &str) -> Option<Self> {
        let caps = VALID_PATH.captures(path)?;
        let group = |i: usize| {
            caps.get(i)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };

        Some(Self {
            full: group(0),
            tail: group(1),
            action: group(2),
            title_with_subpath: group(3),
            title: group(4),
            subpath_tail: group(5),
            image_index: group(6),
        })
    }
}
