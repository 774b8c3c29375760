use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// City slugs from a `wget --spider` mirror of the site: one directory per
/// city under the host folder. Plain files are ignored.
pub fn city_slugs(mirror: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(mirror)
        .with_context(|| format!("Failed to list crawl folder {}", mirror.display()))?;

    let mut slugs = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            slugs.push(name.to_string());
        }
    }
    slugs.sort();

    info!("Found {} city folders in {}", slugs.len(), mirror.display());
    Ok(slugs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_directories_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pargny-02480")).unwrap();
        std::fs::create_dir(dir.path().join("laon-02408")).unwrap();
        std::fs::write(dir.path().join("index.html"), "").unwrap();

        assert_eq!(city_slugs(dir.path()).unwrap(), ["laon-02408", "pargny-02480"]);
    }

    #[test]
    fn missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(city_slugs(&dir.path().join("nope")).is_err());
    }
}
