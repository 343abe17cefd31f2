use lyrics_model::FailureBoundary;
use std::path::PathBuf;
use thiserror::Error;

/// The markup did not have the shape the extractor expects.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing expected element: {0}")]
    MissingElement(&'static str),

    #[error("unexpected structure in {0}")]
    UnexpectedShape(&'static str),
}

/// Failure reading a listing page. Fatal to the page batch.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("failed to fetch listing {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for listing {url}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("failed to read listing body from {url}")]
    Read {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("listing {url} has no table body")]
    MissingTable { url: String },
}

/// Failure reading a single song page. The batch absorbs these.
#[derive(Debug, Error)]
pub enum SongError {
    #[error("failed to fetch song page: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("HTTP {0} for song page")]
    Status(reqwest::StatusCode),

    #[error("failed to read song page body: {0}")]
    Read(#[source] reqwest::Error),

    #[error("failed to parse song page: {0}")]
    Extract(#[from] ExtractError),
}

impl SongError {
    pub fn boundary(&self) -> FailureBoundary {
        match self {
            SongError::Fetch(_) | SongError::Status(_) => FailureBoundary::Fetch,
            SongError::Read(_) | SongError::Extract(_) => FailureBoundary::Parse,
        }
    }
}

/// Errors that stop a crawl run.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("page {page}: {source}")]
    Listing {
        page: u32,
        #[source]
        source: ListingError,
    },

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
