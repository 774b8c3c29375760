pub mod identity;
pub mod nearby;
pub mod scores;

use scraper::Html;

use crate::error::ExtractError;
use crate::record::{to_website_url, CityRecord, ScoreSet, SCORE_MAX};

pub use identity::{extract_display_name, extract_identifier, extract_postal_code};
pub use nearby::extract_nearby_cities;
pub use scores::{detect_scores, extract_scores};

/// Run every field extractor over one parsed `avis.html` page.
pub fn extract_all(doc: &Html, slug: &str, origin: &str) -> Result<CityRecord, ExtractError> {
    let insee_code = extract_identifier(slug)?;
    let name = extract_display_name(doc)?;
    let postal_code = extract_postal_code(doc)?;

    let contains_scores = detect_scores(doc)?;
    let scores = if contains_scores {
        extract_scores(doc)?
    } else {
        ScoreSet::default()
    };

    let nearby_cities = extract_nearby_cities(doc)?;

    Ok(CityRecord {
        url: to_website_url(origin, slug),
        title: slug.to_string(),
        name,
        postal_code,
        insee_code,
        contains_scores,
        scores,
        normalized_scores: scores.normalize(SCORE_MAX),
        nearby_cities,
    })
}

// ── Tests ──
