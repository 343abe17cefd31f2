use crate::error::CrawlError;
use lyrics_model::{OutputRecord, SongData, SongReference};
use std::fs;
use std::path::Path;

/// Write one song's files under `output_root`.
///
/// Creates the song directory if needed, then writes:
/// - `lyrics.txt` — paragraphs separated by a blank line
/// - `moods.txt` — one mood label per line
///
/// Existing files are overwritten, so writing the same data twice leaves
/// the same contents.
pub fn write_song(
    reference: &SongReference,
    data: &SongData,
    output_root: &Path,
) -> Result<OutputRecord, CrawlError> {
    let record = OutputRecord::new(reference, data, output_root);

    fs::create_dir_all(&record.dir).map_err(|source| CrawlError::Io {
        path: record.dir.clone(),
        source,
    })?;

    let lyrics_path = record.lyrics_path();
    fs::write(&lyrics_path, &record.lyrics).map_err(|source| CrawlError::Io {
        path: lyrics_path.clone(),
        source,
    })?;

    let moods_path = record.moods_path();
    fs::write(&moods_path, &record.moods).map_err(|source| CrawlError::Io {
        path: moods_path.clone(),
        source,
    })?;

    tracing::debug!(
        path = %record.dir.display(),
        paragraphs = data.lyrics.len(),
        moods = data.moods.len(),
        "Wrote song"
    );

    Ok(record)
}
