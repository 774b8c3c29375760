mod crawl;
mod error;
mod export;
mod parser;
mod pipeline;
mod record;
mod settings;
mod sitemap;
mod source;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use settings::Settings;
use sitemap::PageKind;

#[derive(Parser)]
#[command(name = "ville_scraper", about = "City review scraper for bien-dans-ma-ville.fr")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the city pages found in a sitemap (file path or url)
    Sitemap {
        sitemap: String,
        /// Match city root urls instead of review pages
        #[arg(long)]
        cities: bool,
    },
    /// Download every review page listed in a sitemap
    Download {
        sitemap: String,
        /// Folder where html files go
        output: PathBuf,
    },
    /// Download review pages for each city folder of a `wget --spider` mirror
    DownloadCrawl {
        /// Host folder of the mirror, one sub-folder per city
        crawl_dir: PathBuf,
        /// Folder where html files go
        output: PathBuf,
    },
    /// Scrape one saved page and print its record
    Page {
        html_file: PathBuf,
    },
    /// Scrape a folder of saved pages into json records and a csv
    Scrape {
        /// The folder containing all html files
        input: PathBuf,
        /// The folder where generated content will go
        output: PathBuf,
    },
    /// Fetch and scrape each city of a crawl mirror straight from the site
    FetchScrape {
        crawl_dir: PathBuf,
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(settings = ?settings, "Loaded settings");

    let result = match cli.command {
        Commands::Sitemap { sitemap: location, cities } => {
            let client = source::http_client(&settings)?;
            let kind = if cities { PageKind::CityRoot } else { PageKind::Reviews };
            let pages = sitemap::fetch_city_pages(&client, &location, &settings.origin, kind).await?;
            for (slug, url) in &pages {
                println!("{}\t{}", slug, url);
            }
            println!("{} pages", pages.len());
            Ok(())
        }
        Commands::Download { sitemap, output } => {
            let client = source::http_client(&settings)?;
            let stats = pipeline::download_from_sitemap(&settings, client, &sitemap, &output).await?;
            println!("Done: {} pages downloaded.", stats.ok);
            Ok(())
        }
        Commands::DownloadCrawl { crawl_dir, output } => {
            let client = source::http_client(&settings)?;
            let stats =
                pipeline::download_from_crawl(&settings, client, &crawl_dir, &output).await?;
            println!(
                "Done: {} pages ({} downloaded, {} skipped).",
                stats.total, stats.ok, stats.skipped
            );
            Ok(())
        }
        Commands::Page { html_file } => {
            let record = pipeline::inspect_page(&settings, &html_file)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Commands::Scrape { input, output } => {
            let stats = pipeline::scrape_folder(&settings, &input, &output).await?;
            println!("Done: {} pages scraped.", stats.ok);
            Ok(())
        }
        Commands::FetchScrape { crawl_dir, output } => {
            let client = source::http_client(&settings)?;
            let stats = pipeline::fetch_and_scrape(&settings, client, &crawl_dir, &output).await?;
            println!(
                "Done: {} pages ({} scraped, {} skipped).",
                stats.total, stats.ok, stats.skipped
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
