use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;
use crate::record::NearbyCityRef;

// "Pargny (02480)": the parenthesised part only shows up for rated cities.
static RATED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*) \(.*\)").unwrap());
static ROWS: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".tab_compare tbody tr").unwrap());
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Neighbouring cities listed in the comparison table, in page order.
pub fn extract_nearby_cities(doc: &Html) -> Result<Vec<NearbyCityRef>, ExtractError> {
    doc.select(&ROWS).map(parse_row).collect()
}

fn parse_row(row: ElementRef) -> Result<NearbyCityRef, ExtractError> {
    let cell = row
        .select(&TD)
        .next()
        .ok_or_else(|| ExtractError::not_found("td in .tab_compare row"))?;

    let url = cell
        .select(&LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| ExtractError::not_found("a[href] in .tab_compare row"))?
        .to_string();

    let text: String = cell.text().collect();
    let (name, contains_scores) = match RATED_NAME_RE.captures(&text) {
        Some(caps) => (caps[1].to_string(), true),
        None => (text, false),
    };

    Ok(NearbyCityRef {
        url,
        name,
        contains_scores,
    })
}
