use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::{listing, output, song};
use futures::stream::{self, StreamExt};
use lyrics_model::{PageReport, RangeReport, SongData, SongDiagnostic, SongReference};
use std::num::NonZeroUsize;
use std::time::Instant;

/// Crawls catalog pages and writes every song found on them to disk.
pub struct Crawler {
    client: reqwest::Client,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(CrawlError::Client)?;

        Ok(Self { client, config })
    }

    /// Process pages `start..end` one after another.
    ///
    /// A page's songs are all written before the next page is requested.
    /// Pages without songs do not end the run early; the first listing or
    /// write failure does.
    pub async fn crawl_range(&self, start: u32, end: u32) -> Result<RangeReport, CrawlError> {
        let mut report = RangeReport::new(start, end);

        for page in start..end {
            let page_report = self.process_page(page).await?;
            report.pages.push(page_report);
        }

        tracing::info!(
            pages = report.pages.len(),
            songs = report.total_songs(),
            failed = report.total_failed(),
            "Finished page range"
        );

        Ok(report)
    }

    /// Fetch one listing page, fetch all of its songs, and write them.
    ///
    /// Song failures are recorded in the report and written as empty
    /// files; a listing failure or a write error is returned.
    pub async fn process_page(&self, page: u32) -> Result<PageReport, CrawlError> {
        tracing::info!(page, "Fetching data from page");

        let references =
            listing::fetch_song_references(&self.client, &self.config.listing_url(), Some(page))
                .await
                .map_err(|source| CrawlError::Listing { page, source })?;

        let songs = references.len();
        if songs == 0 {
            tracing::info!(page, "Page has no songs");
        }

        tracing::info!(page, songs, "Fetching songs");
        let started = Instant::now();
        let results = self.read_songs(&references).await;
        let fetch_ms = started.elapsed().as_millis() as u64;
        tracing::info!(page, songs, elapsed_ms = fetch_ms, "Fetched songs");

        let mut failed = Vec::new();
        let mut data = Vec::with_capacity(songs);
        for (song_data, diagnostic) in results {
            data.push(song_data);
            failed.extend(diagnostic);
        }

        tracing::info!(page, songs, "Writing songs");
        let started = Instant::now();
        for (reference, song_data) in references.iter().zip(&data) {
            output::write_song(reference, song_data, &self.config.output_dir)?;
        }
        let write_ms = started.elapsed().as_millis() as u64;
        tracing::info!(page, songs, elapsed_ms = write_ms, "Wrote songs");

        Ok(PageReport {
            page,
            songs,
            failed,
            fetch_ms,
            write_ms,
        })
    }

    /// Read every referenced song, at most `concurrency` at a time.
    ///
    /// Results come back in the order of `references`, whatever order the
    /// fetches finish in.
    async fn read_songs(
        &self,
        references: &[SongReference],
    ) -> Vec<(SongData, Option<SongDiagnostic>)> {
        let limit = self
            .config
            .concurrency
            .map_or(references.len(), NonZeroUsize::get)
            .max(1);

        stream::iter(references)
            .map(|reference| self.read_song(reference))
            .buffered(limit)
            .collect()
            .await
    }

    /// Read one song; a failure becomes empty data plus a diagnostic.
    async fn read_song(&self, reference: &SongReference) -> (SongData, Option<SongDiagnostic>) {
        let url = reference.url(&self.config.root_url);

        match song::fetch_song(&self.client, &url).await {
            Ok(data) => (data, None),
            Err(error) => {
                tracing::error!(url = %url, error = %error, "Failed to read song page");
                let diagnostic = SongDiagnostic {
                    reference: reference.clone(),
                    boundary: error.boundary(),
                    error: error.to_string(),
                    url,
                };
                (SongData::empty(), Some(diagnostic))
            }
        }
    }
}
