use serde::{Deserialize, Serialize};

use crate::song::SongReference;

/// Which step of reading a song page failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureBoundary {
    /// Transport error, non-success status, or unreadable body.
    Fetch,
    /// The page arrived but its markup did not have the expected shape.
    Parse,
}

/// A song whose data was replaced by an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDiagnostic {
    pub reference: SongReference,
    pub url: String,
    pub boundary: FailureBoundary,
    pub error: String,
}

/// Outcome of one page batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageReport {
    pub page: u32,
    /// Number of song references found on the listing page.
    pub songs: usize,
    pub failed: Vec<SongDiagnostic>,
    pub fetch_ms: u64,
    pub write_ms: u64,
}

impl PageReport {
    pub fn succeeded(&self) -> usize {
        self.songs - self.failed.len()
    }
}

/// Outcome of a whole range run, one entry per page in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeReport {
    pub start_page: u32,
    pub end_page: u32,
    pub generated_at: String,
    pub pages: Vec<PageReport>,
}

impl RangeReport {
    pub fn new(start_page: u32, end_page: u32) -> Self {
        Self {
            start_page,
            end_page,
            generated_at: chrono::Utc::now().to_rfc3339(),
            pages: Vec::new(),
        }
    }

    pub fn total_songs(&self) -> usize {
        self.pages.iter().map(|p| p.songs).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.pages.iter().map(|p| p.failed.len()).sum()
    }

    /// Pages whose listing held no songs. The run does not stop at them.
    pub fn empty_pages(&self) -> Vec<u32> {
        self.pages.iter().filter(|p| p.songs == 0).map(|p| p.page).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(path: &str) -> SongDiagnostic {
        SongDiagnostic {
            reference: SongReference::parse(path).unwrap(),
            url: format!("https://lyrics.fi{path}"),
            boundary: FailureBoundary::Fetch,
            error: "connection refused".into(),
        }
    }

    #[test]
    fn test_range_totals() {
        let mut report = RangeReport::new(1, 4);
        report.pages.push(PageReport { page: 1, songs: 3, failed: vec![diagnostic("/a/b")], ..Default::default() });
        report.pages.push(PageReport { page: 2, songs: 0, ..Default::default() });
        report.pages.push(PageReport { page: 3, songs: 2, ..Default::default() });

        assert_eq!(report.total_songs(), 5);
        assert_eq!(report.total_failed(), 1);
        assert_eq!(report.pages[0].succeeded(), 2);
        assert_eq!(report.empty_pages(), vec![2]);
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = RangeReport::new(1, 2);
        report.pages.push(PageReport { page: 1, songs: 1, failed: vec![diagnostic("/a/b")], ..Default::default() });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pages"][0]["failed"][0]["boundary"], "fetch");
        assert_eq!(json["pages"][0]["failed"][0]["reference"], "/a/b");
        assert!(json["generated_at"].is_string());
    }
}
