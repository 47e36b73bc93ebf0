//! Fetches the public fuel-advisory page and pulls out the buying-tip
//! paragraph that feeds the tip rewriter.
//!
//! The page layout is assumed, not negotiated: the tip lives in the first
//! `<li>` of a fixed-position `<ul>`, sometimes wrapped in a `<p>`. Parsing
//! robustness beyond that is out of scope; a page that no longer matches is
//! a hard error and the run fails.

use anyhow::{Result, bail};

use crate::fetch::{HttpClient, fetch_text};

/// Downloads the advisory page and extracts the buying-tip paragraph from
/// the `list_index`-th `<ul>` element.
pub async fn fetch_advisory<C: HttpClient>(
    client: &C,
    url: &str,
    list_index: usize,
) -> Result<String> {
    let html = fetch_text(client, url).await?;
    extract_list_item(&html, list_index)
}

/// Extracts the text of the first `<li>` inside the `index`-th `<ul>` on the
/// page, preferring the content of an inner `<p>` when one is present.
pub fn extract_list_item(html: &str, index: usize) -> Result<String> {
    let lists = list_blocks(html);
    if lists.len() <= index {
        bail!(
            "expected at least {} <ul> elements on the advisory page, found {}",
            index + 1,
            lists.len()
        );
    }

    let Some(item) = inner_block(lists[index], "li") else {
        bail!("advisory <ul> at index {index} has no <li> element");
    };

    let fragment = inner_block(item, "p").unwrap_or(item);
    Ok(collapse_whitespace(&strip_tags(fragment)))
}

/// All `<ul>...</ul>` blocks on the page, in document order.
fn list_blocks(html: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = html;

    while let Some(start) = rest.find("<ul") {
        let after = &rest[start..];
        let Some(end) = after.find("</ul>") else {
            break;
        };
        blocks.push(&after[..end]);
        rest = &after[end + "</ul>".len()..];
    }

    blocks
}

/// The content of the first `<tag ...>` element in `block`, up to its
/// closing tag (or the end of the block when unclosed).
fn inner_block<'a>(block: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let start = block.find(&open)?;
    let after_open = &block[start..];
    let body_start = after_open.find('>')? + 1;
    let body = &after_open[body_start..];

    let end = body.find(&close).unwrap_or(body.len());
    Some(&body[..end])
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;

    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <ul><li>navigation</li></ul>
        <ul>
            <li><p>Prices are expected to fall over
                the coming week.</p></li>
            <li><p>Second tip.</p></li>
        </ul>
        <ul><li>No paragraph wrapper here</li></ul>
        </body></html>
    "#;

    #[test]
    fn test_prefers_inner_paragraph() {
        let tip = extract_list_item(PAGE, 1).unwrap();
        assert_eq!(tip, "Prices are expected to fall over the coming week.");
    }

    #[test]
    fn test_falls_back_to_list_item_text() {
        let tip = extract_list_item(PAGE, 2).unwrap();
        assert_eq!(tip, "No paragraph wrapper here");
    }

    #[test]
    fn test_takes_first_list_item_only() {
        let tip = extract_list_item(PAGE, 1).unwrap();
        assert!(!tip.contains("Second tip"));
    }

    #[test]
    fn test_too_few_lists_is_an_error() {
        assert!(extract_list_item(PAGE, 23).is_err());
        assert!(extract_list_item("<html></html>", 0).is_err());
    }

    #[test]
    fn test_list_without_items_is_an_error() {
        assert!(extract_list_item("<ul><span>x</span></ul>", 0).is_err());
    }
}
