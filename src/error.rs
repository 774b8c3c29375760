use thiserror::Error;

/// Failures while pulling fields out of a city page.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("cannot parse {what}: {value:?}")]
    Parse { what: String, value: String },
}

impl ExtractError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn parse(what: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            value: value.into(),
        }
    }
}

/// Failures while loading a page over HTTP.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("no html content found in url {url}")]
    EmptyBody { url: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
