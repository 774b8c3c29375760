use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::crawl;
use crate::export;
use crate::parser;
use crate::record::CityRecord;
use crate::settings::Settings;
use crate::sitemap::{self, PageKind};
use crate::source::{save_html, FolderSource, HttpSource, PageSource};

/// Counts returned after a batch run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub ok: usize,
    pub skipped: usize,
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta}) {msg}")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

/// Download every `avis.html` page listed in a sitemap into `output`.
/// Any failed or empty response aborts the run.
pub async fn download_from_sitemap(
    settings: &Settings,
    client: reqwest::Client,
    sitemap_location: &str,
    output: &Path,
) -> Result<RunStats> {
    let pages =
        sitemap::fetch_city_pages(&client, sitemap_location, &settings.origin, PageKind::Reviews)
            .await?;
    println!("Got {} websites", pages.len());

    let source = HttpSource::new(client, settings.origin.clone());
    let pb = progress_bar(pages.len())?;
    for (slug, url) in &pages {
        pb.set_message(format!("Fetch url \"{}\"", url));
        let html = source
            .fetch_url(url)
            .await
            .with_context(|| format!("Failed to download {}", slug))?;
        save_html(output, slug, &html)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!("Downloaded {} pages into {}", pages.len(), output.display());
    Ok(RunStats {
        total: pages.len(),
        ok: pages.len(),
        skipped: 0,
    })
}

/// Download the `avis.html` page of every city folder found in a crawl mirror.
/// Non-200 answers are logged and skipped.
pub async fn download_from_crawl(
    settings: &Settings,
    client: reqwest::Client,
    crawl_dir: &Path,
    output: &Path,
) -> Result<RunStats> {
    let slugs = crawl::city_slugs(crawl_dir)?;
    let source = HttpSource::new(client, settings.origin.clone());

    let mut stats = RunStats {
        total: slugs.len(),
        ..Default::default()
    };
    let pb = progress_bar(slugs.len())?;
    for slug in &slugs {
        pb.set_message(source.locate(slug));
        match source.load(slug).await {
            Ok(html) => {
                save_html(output, slug, &html)?;
                stats.ok += 1;
            }
            Err(e) if HttpSource::is_skippable(&e) => {
                warn!("An error happened : {}", e);
                stats.skipped += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to download {}", slug)),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        "Downloaded {} of {} pages ({} skipped)",
        stats.ok, stats.total, stats.skipped
    );
    Ok(stats)
}

/// Parse every `*.html` file in `input`, writing one json per city and the
/// aggregate csv into `output`.
pub async fn scrape_folder(settings: &Settings, input: &Path, output: &Path) -> Result<RunStats> {
    let source = FolderSource::new(input);
    let slugs = source.slugs()?;
    let (records, stats) = scrape_pages(settings, &source, &slugs, output).await?;
    write_aggregate(settings, output, &records)?;
    Ok(stats)
}

/// Fetch every city of a crawl mirror from the live site and scrape it
/// without keeping the html.
pub async fn fetch_and_scrape(
    settings: &Settings,
    client: reqwest::Client,
    crawl_dir: &Path,
    output: &Path,
) -> Result<RunStats> {
    let slugs = crawl::city_slugs(crawl_dir)?;
    let source = HttpSource::new(client, settings.origin.clone());
    let (records, stats) = scrape_pages(settings, &source, &slugs, output).await?;
    write_aggregate(settings, output, &records)?;
    Ok(stats)
}

/// Load, parse and save each slug in order. Stops at the first error the
/// source does not mark as skippable.
pub async fn scrape_pages<S: PageSource>(
    settings: &Settings,
    source: &S,
    slugs: &[String],
    output: &Path,
) -> Result<(Vec<CityRecord>, RunStats)> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let mut records = Vec::with_capacity(slugs.len());
    let mut stats = RunStats {
        total: slugs.len(),
        ..Default::default()
    };

    let pb = progress_bar(slugs.len())?;
    for slug in slugs {
        let location = source.locate(slug);
        pb.set_message(format!("Work on url \"{}\"", location));

        let html = match source.load(slug).await {
            Ok(html) => html,
            Err(e) if S::is_skippable(&e) => {
                warn!("Skipping {}: {}", slug, e);
                stats.skipped += 1;
                pb.inc(1);
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to load {}", location)),
        };

        let record = parser::process_page(&html, slug, &settings.origin)
            .with_context(|| format!("Failed to scrape {}", location))?;
        export::write_record(output, &record)?;
        records.push(record);
        stats.ok += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        "Scraped {} of {} pages ({} skipped)",
        stats.ok, stats.total, stats.skipped
    );
    Ok((records, stats))
}

fn write_aggregate(settings: &Settings, output: &Path, records: &[CityRecord]) -> Result<()> {
    let path = output.join(&settings.csv_name);
    export::write_csv(&path, records)?;
    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Parse a single saved page; the slug is the file stem.
pub fn inspect_page(settings: &Settings, html_file: &Path) -> Result<CityRecord> {
    let slug = html_file
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("No file name in {}", html_file.display()))?;
    let html = std::fs::read_to_string(html_file)
        .with_context(|| format!("Failed to read {}", html_file.display()))?;
    parser::process_page(&html, slug, &settings.origin)
        .with_context(|| format!("Failed to scrape {}", html_file.display()))
}
