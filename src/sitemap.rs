use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info};

/// Which urls of the sitemap to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// `<origin>/<slug>/avis.html`
    Reviews,
    /// `<origin>/<slug>/`
    CityRoot,
}

/// Read a sitemap from a local file or an http(s) url and return
/// `(slug, url)` pairs in document order.
pub async fn fetch_city_pages(
    client: &reqwest::Client,
    location: &str,
    origin: &str,
    kind: PageKind,
) -> Result<Vec<(String, String)>> {
    let xml = if location.starts_with("http://") || location.starts_with("https://") {
        info!("Fetching sitemap: {}", location);
        client
            .get(location)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
            .context("Failed to fetch sitemap")?
    } else {
        info!("Reading sitemap: {}", location);
        std::fs::read_to_string(Path::new(location))
            .with_context(|| format!("Failed to read sitemap {}", location))?
    };

    let pages = city_pages(&xml, origin, kind)?;
    info!("City pages in sitemap: {}", pages.len());
    Ok(pages)
}

/// Filter sitemap text down to city pages.
///
/// The site ships some sitemaps as a single run of concatenated urls with no
/// `<loc>` markup; those are scanned as plain text.
pub fn city_pages(xml: &str, origin: &str, kind: PageKind) -> Result<Vec<(String, String)>> {
    let re = page_pattern(origin, kind)?;

    let locs = parse_urlset(xml).unwrap_or_default();
    let haystacks: Vec<&str> = if locs.is_empty() {
        debug!("No <loc> entries, scanning raw sitemap text");
        vec![xml]
    } else {
        debug!("Total URLs in sitemap: {}", locs.len());
        locs.iter().map(String::as_str).collect()
    };

    let pages = haystacks
        .into_iter()
        .flat_map(|text| re.captures_iter(text))
        .map(|c| (c[1].to_string(), c[0].to_string()))
        .collect();
    Ok(pages)
}

fn page_pattern(origin: &str, kind: PageKind) -> Result<Regex> {
    let origin = regex::escape(origin.trim_end_matches('/'));
    let pattern = match kind {
        PageKind::Reviews => format!(r"{origin}/([^/\s<]+?)/avis\.html"),
        PageKind::CityRoot => format!(r"{origin}/([^/\s<]+?)/"),
    };
    Ok(Regex::new(&pattern)?)
}

/// Parse a urlset XML and return all <loc> URLs.
fn parse_urlset(xml: &str) -> Result<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut urls = Vec::new();
    let mut in_url = false;
    let mut in_loc = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => match e.name().as_ref() {
                b"url" => in_url = true,
                b"loc" if in_url => in_loc = true,
                _ => {}
            },
            Ok(quick_xml::events::Event::Text(e)) if in_loc => {
                let loc = e.unescape()?;
                let loc = loc.trim();
                // sitemap indexes and image entries carry relative or non-web locs
                if loc.starts_with("http://") || loc.starts_with("https://") {
                    urls.push(loc.to_string());
                } else {
                    debug!("Skipping non-http loc {:?}", loc);
                }
            }
            Ok(quick_xml::events::Event::End(e)) => match e.name().as_ref() {
                b"loc" => in_loc = false,
                b"url" => in_url = false,
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.bien-dans-ma-ville.fr";

    #[test]
    fn urlset_reviews() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://www.bien-dans-ma-ville.fr/gergny-02342/avis.html</loc></url>
  <url><loc>https://www.bien-dans-ma-ville.fr/ajaccio-2A004/avis.html</loc></url>
  <url><loc>https://www.bien-dans-ma-ville.fr/gergny-02342/immobilier.html</loc></url>
</urlset>"#;
        let pages = city_pages(xml, ORIGIN, PageKind::Reviews).unwrap();
        assert_eq!(
            pages,
            vec![
                (
                    "gergny-02342".to_string(),
                    "https://www.bien-dans-ma-ville.fr/gergny-02342/avis.html".to_string()
                ),
                (
                    "ajaccio-2A004".to_string(),
                    "https://www.bien-dans-ma-ville.fr/ajaccio-2A004/avis.html".to_string()
                ),
            ]
        );
    }

    #[test]
    fn raw_concatenated_sitemap() {
        let text = "https://www.bien-dans-ma-ville.fr/laon-02408/avis.htmlhttps://www.bien-dans-ma-ville.fr/pargny-02480/avis.html";
        let slugs: Vec<String> = city_pages(text, ORIGIN, PageKind::Reviews)
            .unwrap()
            .into_iter()
            .map(|(slug, _)| slug)
            .collect();
        assert_eq!(slugs, ["laon-02408", "pargny-02480"]);
    }

    #[test]
    fn city_roots() {
        let xml = "<urlset><url><loc>https://www.bien-dans-ma-ville.fr/laon-02408/</loc></url>\
                   <url><loc>https://www.bien-dans-ma-ville.fr/</loc></url></urlset>";
        let pages = city_pages(xml, ORIGIN, PageKind::CityRoot).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].0, "laon-02408");
        assert_eq!(pages[0].1, "https://www.bien-dans-ma-ville.fr/laon-02408/");
    }

    #[test]
    fn non_http_locs_skipped() {
        let xml = "<urlset><url><loc>/laon-02408/avis.html</loc></url>\
                   <url><loc> https://www.bien-dans-ma-ville.fr/pargny-02480/avis.html </loc></url></urlset>";
        assert_eq!(
            parse_urlset(xml).unwrap(),
            ["https://www.bien-dans-ma-ville.fr/pargny-02480/avis.html"]
        );
    }

    #[test]
    fn other_hosts_ignored() {
        let xml = "<urlset><url><loc>https://example.com/laon-02408/avis.html</loc></url></urlset>";
        assert!(city_pages(xml, ORIGIN, PageKind::Reviews).unwrap().is_empty());
    }

    #[tokio::test]
    async fn reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap-villeavis.xml");
        std::fs::write(
            &path,
            "<urlset><url><loc>https://www.bien-dans-ma-ville.fr/laon-02408/avis.html</loc></url></urlset>",
        )
        .unwrap();

        let client = reqwest::Client::new();
        let pages = fetch_city_pages(&client, path.to_str().unwrap(), ORIGIN, PageKind::Reviews)
            .await
            .unwrap();
        assert_eq!(pages[0].0, "laon-02408");
    }
}
