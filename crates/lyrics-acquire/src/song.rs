use crate::error::{ExtractError, SongError};
use crate::html::{class_is, simplify, strip_stray_line_break, tag_is, Document, Plain, Shape};
use lyrics_model::SongData;

/// Fetch and extract one song page.
///
/// Transport errors and non-success statuses fail at the fetch boundary;
/// body read and extraction errors fail at the parse boundary (see
/// [`SongError::boundary`]). Nothing is retried.
pub async fn fetch_song(client: &reqwest::Client, url: &str) -> Result<SongData, SongError> {
    let response = client.get(url).send().await.map_err(SongError::Fetch)?;

    let status = response.status();
    if !status.is_success() {
        return Err(SongError::Status(status));
    }

    let html = response.text().await.map_err(SongError::Read)?;
    tracing::debug!(url = %url, bytes = html.len(), "Received song HTML");

    Ok(parse_song(&html)?)
}

/// Extract lyrics paragraphs and mood tags from a song page.
pub fn parse_song(html: &str) -> Result<SongData, ExtractError> {
    let document = Document::parse(&strip_stray_line_break(html));

    let lyrics_el = document
        .find_first(class_is("lyrics"))
        .ok_or(ExtractError::MissingElement("lyrics"))?;

    let paragraphs = simplify(lyrics_el)
        .get("p")
        .cloned()
        .ok_or(ExtractError::MissingElement("p"))?;

    let lyrics = match paragraphs {
        Shape::None => return Err(ExtractError::MissingElement("p")),
        Shape::One(Plain::Text(text)) => vec![text],
        Shape::One(Plain::Element { .. }) => {
            return Err(ExtractError::UnexpectedShape("lyrics paragraph"))
        }
        Shape::Many(items) => items
            .into_iter()
            .map(|item| match item {
                Plain::Text(text) => Ok(text),
                Plain::Element { .. } => Err(ExtractError::UnexpectedShape("lyrics paragraph")),
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    // Songs without mood tags have no mood element at all.
    let moods = match document.find_first(class_is("mood")) {
        Some(mood_el) => mood_el
            .find_all(tag_is("a"))
            .into_vec()
            .into_iter()
            .filter_map(|a| a.attr("title"))
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };

    Ok(SongData { lyrics, moods })
}
