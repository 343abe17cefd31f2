use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Reference paths longer than this get every segment clipped.
pub const MAX_PATH_LENGTH: usize = 100;

/// Per-segment cap applied once a path is over [`MAX_PATH_LENGTH`].
pub const MAX_SEGMENT_LENGTH: usize = MAX_PATH_LENGTH / 2;

pub const LYRICS_FILE: &str = "lyrics.txt";
pub const MOODS_FILE: &str = "moods.txt";

/// Relative path of a song detail page, as linked from a listing page
/// (e.g. `/artist/song-title`).
///
/// Deserializing goes through [`SongReference::parse`], so a reference read
/// back from a report obeys the same rules as one taken from a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SongReference(String);

impl SongReference {
    /// Accept a listing link only if it points at a same-origin song page.
    ///
    /// Rejected: empty links, cross-origin links (`//`), links without a
    /// `/`, links whose first segment is empty (template URLs such as
    /// `//` or `/`), and links with a `..` segment.
    pub fn parse(href: &str) -> Option<Self> {
        if href.is_empty() || href.contains("//") || !href.contains('/') {
            return None;
        }
        match href.split('/').nth(1) {
            Some(first) if !first.is_empty() => {}
            _ => return None,
        }
        if href.split('/').any(|segment| segment == "..") {
            return None;
        }
        Some(Self(href.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute URL of the song page under the catalog root.
    pub fn url(&self, root: &str) -> String {
        format!("{root}{}", self.0)
    }

    /// The reference path as used on disk.
    ///
    /// Paths up to [`MAX_PATH_LENGTH`] characters are kept as-is; longer
    /// ones have each `/`-separated segment cut to [`MAX_SEGMENT_LENGTH`]
    /// characters.
    pub fn truncated(&self) -> String {
        if self.0.chars().count() <= MAX_PATH_LENGTH {
            return self.0.clone();
        }
        self.0
            .split('/')
            .map(|segment| segment.chars().take(MAX_SEGMENT_LENGTH).collect::<String>())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Directory under `output_root` that holds this song's files.
    pub fn output_dir(&self, output_root: &Path) -> PathBuf {
        let truncated = self.truncated();
        let relative = truncated.trim_start_matches('/');
        if relative.is_empty() {
            output_root.to_path_buf()
        } else {
            output_root.join(relative)
        }
    }
}

impl fmt::Display for SongReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SongReference {
    type Error = String;

    fn try_from(href: String) -> Result<Self, Self::Error> {
        Self::parse(&href).ok_or_else(|| format!("not a song reference: {href:?}"))
    }
}

impl From<SongReference> for String {
    fn from(reference: SongReference) -> Self {
        reference.0
    }
}

/// Fields extracted from one song detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongData {
    /// Lyrics paragraphs in document order.
    pub lyrics: Vec<String>,
    /// Mood tag labels in document order; often empty.
    pub moods: Vec<String>,
}

impl SongData {
    /// The value used in place of a song that could not be fetched or parsed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lyrics.is_empty() && self.moods.is_empty()
    }

    /// Contents of `lyrics.txt`: paragraphs separated by a blank line.
    pub fn lyrics_text(&self) -> String {
        self.lyrics.join("\n\n")
    }

    /// Contents of `moods.txt`: one label per line.
    pub fn moods_text(&self) -> String {
        self.moods.join("\n")
    }
}

/// What gets written to disk for one song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub dir: PathBuf,
    pub lyrics: String,
    pub moods: String,
}

impl OutputRecord {
    pub fn new(reference: &SongReference, data: &SongData, output_root: &Path) -> Self {
        Self {
            dir: reference.output_dir(output_root),
            lyrics: data.lyrics_text(),
            moods: data.moods_text(),
        }
    }

    pub fn lyrics_path(&self) -> PathBuf {
        self.dir.join(LYRICS_FILE)
    }

    pub fn moods_path(&self) -> PathBuf {
        self.dir.join(MOODS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_song_paths() {
        let r = SongReference::parse("/artist/song-a").unwrap();
        assert_eq!(r.as_str(), "/artist/song-a");
        assert_eq!(r.url("https://lyrics.fi"), "https://lyrics.fi/artist/song-a");
    }

    #[test]
    fn test_parse_rejects_bad_links() {
        assert!(SongReference::parse("").is_none());
        assert!(SongReference::parse("http://external.com/x").is_none());
        assert!(SongReference::parse("//cdn.example.com/x").is_none());
        assert!(SongReference::parse("no-slash").is_none());
        assert!(SongReference::parse("/").is_none());
        assert!(SongReference::parse("//").is_none());
        assert!(SongReference::parse("/artist/../../etc").is_none());
    }

    #[test]
    fn test_short_path_is_untouched() {
        let path = format!("/{}/{}", "a".repeat(60), "b".repeat(38));
        assert_eq!(path.len(), MAX_PATH_LENGTH);
        let r = SongReference::parse(&path).unwrap();
        assert_eq!(r.truncated(), path);
    }

    #[test]
    fn test_long_path_clips_every_segment() {
        let path = format!("/{}/{}", "a".repeat(70), "b".repeat(40));
        let r = SongReference::parse(&path).unwrap();
        let truncated = r.truncated();
        assert_eq!(truncated, format!("/{}/{}", "a".repeat(50), "b".repeat(40)));
        assert!(truncated.split('/').all(|s| s.chars().count() <= MAX_SEGMENT_LENGTH));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let path = format!("/{}/x", "ä".repeat(120));
        let r = SongReference::parse(&path).unwrap();
        assert_eq!(r.truncated(), format!("/{}/x", "ä".repeat(50)));
    }

    #[test]
    fn test_output_dir_is_relative_to_root() {
        let r = SongReference::parse("/artist/song-a").unwrap();
        assert_eq!(
            r.output_dir(Path::new("songData")),
            Path::new("songData").join("artist/song-a")
        );
    }

    #[test]
    fn test_song_data_text() {
        let data = SongData {
            lyrics: vec!["first verse".into(), "second verse".into()],
            moods: vec!["Happy".into(), "Calm".into()],
        };
        assert_eq!(data.lyrics_text(), "first verse\n\nsecond verse");
        assert_eq!(data.moods_text(), "Happy\nCalm");
        assert_eq!(SongData::empty().lyrics_text(), "");
        assert!(SongData::empty().is_empty());
    }

    #[test]
    fn test_deserialize_applies_link_rules() {
        let r: SongReference = serde_json::from_str("\"/artist/song-a\"").unwrap();
        assert_eq!(r.as_str(), "/artist/song-a");
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"/artist/song-a\"");

        assert!(serde_json::from_str::<SongReference>("\"/a/../b\"").is_err());
        assert!(serde_json::from_str::<SongReference>("\"//cdn.example.com/x\"").is_err());
        assert!(serde_json::from_str::<SongReference>("\"\"").is_err());
    }

    #[test]
    fn test_output_record_paths() {
        let r = SongReference::parse("/artist/song-a").unwrap();
        let record = OutputRecord::new(&r, &SongData::empty(), Path::new("out"));
        assert_eq!(record.lyrics_path(), Path::new("out/artist/song-a/lyrics.txt"));
        assert_eq!(record.moods_path(), Path::new("out/artist/song-a/moods.txt"));
    }
}
