use std::num::NonZeroUsize;
use std::path::PathBuf;

pub const DEFAULT_ROOT_URL: &str = "https://lyrics.fi";
pub const DEFAULT_OUTPUT_DIR: &str = "songData";

/// Settings for a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Catalog root, without a trailing slash (e.g. `https://lyrics.fi`).
    pub root_url: String,
    /// Directory that receives one subdirectory per song.
    pub output_dir: PathBuf,
    /// Cap on song fetches in flight at once within a page.
    /// `None` issues every fetch for the page together.
    pub concurrency: Option<NonZeroUsize>,
    pub user_agent: String,
}

impl CrawlConfig {
    pub fn new(root_url: &str, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_url: root_url.trim_end_matches('/').to_string(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_concurrency(mut self, concurrency: Option<NonZeroUsize>) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// URL of the full catalog listing.
    pub fn listing_url(&self) -> String {
        format!("{}/.all", self.root_url)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: None,
            user_agent: format!("lyrics/{} (lyrics catalog crawler)", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = CrawlConfig::new("http://localhost:8080/", "out");
        assert_eq!(config.root_url, "http://localhost:8080");
        assert_eq!(config.listing_url(), "http://localhost:8080/.all");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.concurrency.is_none());
    }

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::default();
        assert_eq!(config.listing_url(), "https://lyrics.fi/.all");
        assert_eq!(config.output_dir, PathBuf::from("songData"));
    }
}
