use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::ExtractError;

// Mainland codes are 5 digits, Corsican ones look like 2A004 / 2B033.
static INSEE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{5}|\d[A-Z]\d{3}").unwrap());
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static H1_SMALL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1 > small").unwrap());

const NAME_PREFIX: &str = "Avis";

/// INSEE code embedded in a slug such as `gergny-02342`.
pub fn extract_identifier(slug: &str) -> Result<String, ExtractError> {
    INSEE_RE
        .find(slug)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ExtractError::not_found(format!("INSEE code in title {slug}")))
}

/// City name from the page heading. The heading reads like `"Avis Gergny "`
/// followed by a `<small>` holding the postal code.
pub fn extract_display_name(doc: &Html) -> Result<String, ExtractError> {
    let h1 = doc
        .select(&H1)
        .next()
        .ok_or_else(|| ExtractError::not_found("h1"))?;

    let text = h1
        .children()
        .find_map(|node| node.value().as_text().map(|t| String::from(&**t)))
        .ok_or_else(|| ExtractError::not_found("text in h1"))?;

    let name = text.strip_prefix(NAME_PREFIX).unwrap_or(&text);
    Ok(name.trim().to_string())
}

pub fn extract_postal_code(doc: &Html) -> Result<String, ExtractError> {
    doc.select(&H1_SMALL)
        .next()
        .map(|small| small.text().collect::<String>())
        .ok_or_else(|| ExtractError::not_found("h1 > small"))
}
