//! Typed routes built from path matches

use super::PathMatch;

/// What a request path asks the wiki to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    View { title: String },
    Edit { title: String },
    Save { title: String },
    /// Table of contents. Any title in the path is ignored.
    Toc,
    Delete { title: String },
    /// Store an image into slot `index` (1..=9) of `title`
    Upload { title: String, index: u8 },
    NotFound,
}

impl Route {
    /// Route a request path
    pub fn parse(path: &str) -> Self {
        match PathMatch::find(path) {
            Some(m) => Self::from_match(&m),
            None => Self::NotFound,
        }
    }

    /// Interpret the captures of a path match.
    ///
    /// Page actions take the title together with any `/digit` groups. A page
    /// action with no title cannot name a page and is not found; a match with
    /// no action at all is a request for the table of contents.
    pub fn from_match(m: &PathMatch) -> Self {
        let title = m.title_with_subpath.clone();

        match m.action.as_str() {
            "" | "toc" => Self::Toc,
            _ if title.is_empty() => Self::NotFound,
            "view" => Self::View { title },
            "edit" => Self::Edit { title },
            "save" => Self::Save { title },
            "delete" => Self::Delete { title },
            "upload" => match m.image_index.parse::<u8>() {
                Ok(index @ 1..=9) => Self::Upload {
                    title: m.title.clone(),
                    index,
                },
                _ => Self::NotFound,
            },
            _ => Self::NotFound,
        }
    }
}
