use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::debug;

use crate::error::FetchError;
use crate::record::to_website_url;
use crate::settings::Settings;

/// Somewhere city pages can be loaded from, keyed by slug.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn load(&self, slug: &str) -> Result<String, Self::Error>;

    /// Errors a batch run may log and step over instead of aborting.
    fn is_skippable(_err: &Self::Error) -> bool {
        false
    }

    /// Where `slug` lives, for logs and progress messages.
    fn locate(&self, slug: &str) -> String;
}

/// A folder of `<slug>.html` files.
pub struct FolderSource {
    root: PathBuf,
}

impl FolderSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{}.html", slug))
    }

    /// Slugs of every `*.html` file in the folder, sorted.
    pub fn slugs(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list {}", self.root.display()))?;

        let mut slugs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "html") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    slugs.push(stem.to_string());
                }
            }
        }
        slugs.sort();
        Ok(slugs)
    }
}

impl PageSource for FolderSource {
    type Error = std::io::Error;

    async fn load(&self, slug: &str) -> Result<String, Self::Error> {
        tokio::fs::read_to_string(self.path_for(slug)).await
    }

    fn locate(&self, slug: &str) -> String {
        self.path_for(slug).display().to_string()
    }
}

/// The live site: `GET <origin>/<slug>/avis.html`.
pub struct HttpSource {
    client: reqwest::Client,
    origin: String,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, origin: impl Into<String>) -> Self {
        Self {
            client,
            origin: origin.into(),
        }
    }

    pub fn url_for(&self, slug: &str) -> String {
        to_website_url(&self.origin, slug)
    }

    pub async fn fetch_url(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        if body.is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }
        Ok(body)
    }
}

impl PageSource for HttpSource {
    type Error = FetchError;

    async fn load(&self, slug: &str) -> Result<String, Self::Error> {
        self.fetch_url(&self.url_for(slug)).await
    }

    fn is_skippable(err: &Self::Error) -> bool {
        matches!(err, FetchError::Status { .. })
    }

    fn locate(&self, slug: &str) -> String {
        self.url_for(slug)
    }
}

/// Build the shared http client from settings.
pub fn http_client(settings: &Settings) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(settings.user_agent.clone());
    if settings.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
    }
    builder.build().context("Failed to build http client")
}

/// Write a fetched page as `<dir>/<slug>.html`.
pub fn save_html(dir: &Path, slug: &str, html: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(format!("{}.html", slug));
    std::fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
