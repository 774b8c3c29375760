pub mod extract;

use scraper::Html;

use crate::error::ExtractError;
use crate::record::CityRecord;

/// Parse raw page html and turn it into a record for `slug`.
pub fn process_page(html: &str, slug: &str, origin: &str) -> Result<CityRecord, ExtractError> {
    let doc = Html::parse_document(html);
    extract::extract_all(&doc, slug, origin)
}
