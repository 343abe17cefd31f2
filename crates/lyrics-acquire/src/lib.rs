pub mod config;
pub mod crawl;
pub mod error;
pub mod html;
pub mod listing;
pub mod normalize;
pub mod output;
pub mod song;

pub use config::CrawlConfig;
pub use crawl::Crawler;
pub use error::{CrawlError, ExtractError, ListingError, SongError};
