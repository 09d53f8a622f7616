//! List wiki pages

use anyhow::Result;

use crate::Wiki;

/// Print every page title, one per line, in directory order
pub fn run(wiki: &Wiki) -> Result<()> {
    let titles = wiki.list_pages();
    print!("{}", format_listing(&titles));
    Ok(())
}

fn format_listing(titles: &[String]) -> String {
    let mut out = format!("Pages ({}):\n", titles.len());
    for title in titles {
        out.push_str("  ");
        out.push_str(title);
        out.push('\n');
    }
    out
}
