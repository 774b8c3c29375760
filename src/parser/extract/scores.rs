use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::error::ExtractError;
use crate::record::{ScoreSet, SCORE_MAX};

/// Heading text shown in the average-score block of a city nobody reviewed.
pub const NO_REVIEWS: &str = "Pas encore d'avis...";

static SCORE_HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".bloc_notemoyenne > h3").unwrap());
static SCORE_CELLS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.bloc_chiffre td:nth-child(2) > span:nth-child(1)").unwrap()
});

/// Whether the page carries ratings. Every city page has the average-score
/// block, so a missing heading is an error rather than `false`.
pub fn detect_scores(doc: &Html) -> Result<bool, ExtractError> {
    let h3 = doc
        .select(&SCORE_HEADING)
        .next()
        .ok_or_else(|| ExtractError::not_found(".bloc_notemoyenne > h3"))?;

    let text: String = h3.text().collect();
    Ok(text != NO_REVIEWS)
}

/// Read the five ratings, in table order: security, education, hobbies,
/// environment, practicality.
pub fn extract_scores(doc: &Html) -> Result<ScoreSet, ExtractError> {
    let values = doc
        .select(&SCORE_CELLS)
        .map(|span| {
            let text: String = span.text().collect();
            match text.trim().parse::<f64>() {
                Ok(v) if (0.0..=SCORE_MAX).contains(&v) => Ok(v),
                _ => Err(ExtractError::parse("score", text.as_str())),
            }
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let values: [f64; 5] = values
        .try_into()
        .map_err(|v: Vec<f64>| ExtractError::parse("score count", v.len().to_string()))?;

    Ok(ScoreSet::from_values(values))
}
