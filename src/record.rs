use serde::{Deserialize, Serialize};

/// Value stored in every score field when the page has no reviews.
pub const SENTINEL: f64 = -1.0;

/// Highest rating the site hands out.
pub const SCORE_MAX: f64 = 5.0;

/// The five ratings shown on a city page. Field order matches the rows of
/// the page's score table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub security: f64,
    pub education: f64,
    pub hobbies: f64,
    pub environment: f64,
    pub practicality: f64,
}

impl Default for ScoreSet {
    fn default() -> Self {
        Self {
            security: SENTINEL,
            education: SENTINEL,
            hobbies: SENTINEL,
            environment: SENTINEL,
            practicality: SENTINEL,
        }
    }
}

impl ScoreSet {
    pub fn from_values(values: [f64; 5]) -> Self {
        let [security, education, hobbies, environment, practicality] = values;
        Self {
            security,
            education,
            hobbies,
            environment,
            practicality,
        }
    }

    /// Divide every field by `max`. Sentinels are divided too, so an empty
    /// set comes out as all `-1 / max`.
    pub fn normalize(&self, max: f64) -> Self {
        Self {
            security: self.security / max,
            education: self.education / max,
            hobbies: self.hobbies / max,
            environment: self.environment / max,
            practicality: self.practicality / max,
        }
    }

    #[allow(dead_code)]
    pub fn is_absent(&self) -> bool {
        [
            self.security,
            self.education,
            self.hobbies,
            self.environment,
            self.practicality,
        ]
        .iter()
        .all(|v| *v == SENTINEL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyCityRef {
    pub url: String,
    pub name: String,
    pub contains_scores: bool,
}

/// Everything scraped from one `avis.html` page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub url: String,
    pub title: String,
    pub name: String,
    pub postal_code: String,
    pub insee_code: String,
    pub contains_scores: bool,
    pub scores: ScoreSet,
    pub normalized_scores: ScoreSet,
    pub nearby_cities: Vec<NearbyCityRef>,
}

/// Page url for a city slug, e.g. `https://www.bien-dans-ma-ville.fr/gergny-02342/avis.html`.
pub fn to_website_url(origin: &str, slug: &str) -> String {
    format!("{}/{}/avis.html", origin.trim_end_matches('/'), slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_normalizes_to_negative_fifth() {
        let n = ScoreSet::default().normalize(SCORE_MAX);
        assert_eq!(n, ScoreSet::from_values([-0.2; 5]));
        assert!(!n.is_absent());
    }

    #[test]
    fn normalize_divides_each_field() {
        let s = ScoreSet::from_values([5.0, 2.5, 4.0, 1.0, 0.0]);
        let n = s.normalize(SCORE_MAX);
        assert_eq!(n.security, 1.0);
        assert_eq!(n.education, 0.5);
        assert_eq!(n.hobbies, 0.8);
        assert_eq!(n.environment, 0.2);
        assert_eq!(n.practicality, 0.0);
    }

    #[test]
    fn default_is_absent() {
        assert!(ScoreSet::default().is_absent());
        assert!(!ScoreSet::from_values([3.0, -1.0, -1.0, -1.0, -1.0]).is_absent());
    }

    #[test]
    fn website_url() {
        assert_eq!(
            to_website_url("https://www.bien-dans-ma-ville.fr/", "gergny-02342"),
            "https://www.bien-dans-ma-ville.fr/gergny-02342/avis.html"
        );
    }

    #[test]
    fn json_round_trip_keeps_scores_and_neighbours() {
        let scores = ScoreSet::from_values([3.4, 2.1, 4.0, 3.9, 2.7]);
        let record = CityRecord {
            url: "https://www.bien-dans-ma-ville.fr/gergny-02120/avis.html".into(),
            title: "gergny-02120".into(),
            name: "Gergny".into(),
            postal_code: "02120".into(),
            insee_code: "02120".into(),
            contains_scores: true,
            scores,
            normalized_scores: scores.normalize(SCORE_MAX),
            nearby_cities: vec![
                NearbyCityRef {
                    url: "/pargny-02480/avis.html".into(),
                    name: "Pargny".into(),
                    contains_scores: true,
                },
                NearbyCityRef {
                    url: "/erloy-02260/avis.html".into(),
                    name: "Erloy".into(),
                    contains_scores: false,
                },
            ],
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: CityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scores, record.scores);
        assert_eq!(back.nearby_cities, record.nearby_cities);
        assert_eq!(back, record);
    }

    #[test]
    fn json_shape_uses_expected_keys() {
        let record = CityRecord {
            url: String::new(),
            title: "a-01001".into(),
            name: "A".into(),
            postal_code: "01000".into(),
            insee_code: "01001".into(),
            contains_scores: false,
            scores: ScoreSet::default(),
            normalized_scores: ScoreSet::default().normalize(SCORE_MAX),
            nearby_cities: Vec::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            [
                "url",
                "title",
                "name",
                "postal_code",
                "insee_code",
                "contains_scores",
                "scores",
                "normalized_scores",
                "nearby_cities"
            ]
        );
        assert_eq!(value["scores"]["practicality"], -1.0);
        assert_eq!(value["normalized_scores"]["security"], -0.2);
    }
}
