use crate::error::{ExtractError, ListingError};
use crate::html::{tag_is, Document, Element};
use lyrics_model::SongReference;

/// Build the URL of one catalog listing page.
///
/// The `page` query parameter is only added for `Some(n)` with `n > 0`;
/// page 0 and `None` both mean the bare listing.
pub fn listing_page_url(base: &str, page: Option<u32>) -> String {
    match page {
        Some(page) if page > 0 => format!("{base}?page={page}"),
        _ => base.to_string(),
    }
}

/// Fetch one listing page and return the song references on it.
///
/// A single attempt; any transport, status, or table-structure failure is
/// returned to the caller.
pub async fn fetch_song_references(
    client: &reqwest::Client,
    base: &str,
    page: Option<u32>,
) -> Result<Vec<SongReference>, ListingError> {
    let url = listing_page_url(base, page);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| ListingError::Fetch { url: url.clone(), source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ListingError::Status { url, status });
    }

    let html = response
        .text()
        .await
        .map_err(|source| ListingError::Read { url: url.clone(), source })?;
    tracing::debug!(url = %url, bytes = html.len(), "Received listing HTML");

    parse_listing(&html).map_err(|_| ListingError::MissingTable { url })
}

/// Extract song references from listing page markup.
///
/// Rows come from the first `tbody` with at least two rows; the parser adds
/// a `tbody` to every table, so layout tables ahead of the catalog have one
/// too. If no table body has two rows the page has no songs and yields an
/// empty list.
pub fn parse_listing(html: &str) -> Result<Vec<SongReference>, ExtractError> {
    let document = Document::parse(html);

    let bodies = document.find_all(tag_is("tbody")).into_vec();
    let tbody = bodies
        .iter()
        .find(|body| body.children_named("tr").len() >= 2)
        .or_else(|| bodies.first())
        .ok_or(ExtractError::MissingElement("tbody"))?;

    let rows = tbody.children_named("tr");
    if rows.len() < 2 {
        tracing::debug!(rows = rows.len(), "Listing has no song rows");
        return Ok(Vec::new());
    }

    let references = rows
        .into_vec()
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let href = song_link(row);
            if href.is_none() {
                tracing::debug!(row = index, "Skipping row without a song link");
            }
            href
        })
        .filter_map(|href| {
            let reference = SongReference::parse(href);
            if reference.is_none() {
                tracing::debug!(href = %href, "Skipping non-song link");
            }
            reference
        })
        .collect();

    Ok(references)
}

/// The `href` of the anchor in a row's second cell.
fn song_link(row: &Element) -> Option<&str> {
    row.child_elements()
        .filter(|cell| cell.tag == "td" || cell.tag == "th")
        .nth(1)?
        .find_first(tag_is("a"))?
        .attr("href")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(rows: &str) -> String {
        format!(
            r#"<html><body><table class="list">
            <thead><tr><th>#</th><th>Song</th></tr></thead>
            <tbody>{rows}</tbody>
            </table></body></html>"#
        )
    }

    fn refs(html: &str) -> Vec<String> {
        parse_listing(html)
            .unwrap()
            .into_iter()
            .map(|r| r.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_listing_page_url() {
        assert_eq!(listing_page_url("https://lyrics.fi/.all", None), "https://lyrics.fi/.all");
        assert_eq!(listing_page_url("https://lyrics.fi/.all", Some(0)), "https://lyrics.fi/.all");
        assert_eq!(
            listing_page_url("https://lyrics.fi/.all", Some(3)),
            "https://lyrics.fi/.all?page=3"
        );
    }

    #[test]
    fn test_external_link_filtered() {
        let html = listing(
            r#"
            <tr><th>#</th><th>Song</th></tr>
            <tr><td>1</td><td><a href="/artist/song-a">Song A</a></td></tr>
            <tr><td>2</td><td><a href="http://external.com/x">Elsewhere</a></td></tr>
            "#,
        );
        assert_eq!(refs(&html), vec!["/artist/song-a"]);
    }

    #[test]
    fn test_filters_bad_links_and_keeps_order() {
        let html = listing(
            r#"
            <tr><td>1</td><td><a href="/b-artist/second">B</a></td></tr>
            <tr><td>2</td><td><a href="relative">no slash</a></td></tr>
            <tr><td>3</td><td><a href="//cdn.example.com/x">cdn</a></td></tr>
            <tr><td>4</td><td><a href="/">root</a></td></tr>
            <tr><td>5</td><td><a href="/a-artist/first">A</a></td></tr>
            <tr><td>6</td><td>no link here</td></tr>
            "#,
        );
        assert_eq!(refs(&html), vec!["/b-artist/second", "/a-artist/first"]);
    }

    #[test]
    fn test_fewer_than_two_rows_is_empty() {
        let one_row = listing(r#"<tr><td>1</td><td><a href="/artist/song">S</a></td></tr>"#);
        assert!(refs(&one_row).is_empty());
        assert!(refs(&listing("")).is_empty());
    }

    #[test]
    fn test_layout_table_before_catalog_is_skipped() {
        let html = r#"<html><body>
            <table><tr><td>logo</td><td>nav</td></tr></table>
            <table><tbody>
              <tr><th>#</th><th>Song</th></tr>
              <tr><td>1</td><td><a href="/artist/song-a">A</a></td></tr>
              <tr><td>2</td><td><a href="/artist/song-b">B</a></td></tr>
            </tbody></table>
            </body></html>"#;
        assert_eq!(refs(html), vec!["/artist/song-a", "/artist/song-b"]);
    }

    #[test]
    fn test_missing_tbody_is_error() {
        let err = parse_listing("<html><body><p>maintenance</p></body></html>").unwrap_err();
        assert!(matches!(err, ExtractError::MissingElement("tbody")));
    }

    #[test]
    fn test_anchor_only_read_from_second_cell() {
        let html = listing(
            r#"
            <tr><td><a href="/wrong/cell">x</a></td><td><a href="/right/cell">y</a></td></tr>
            <tr><td><a href="/wrong/again">x</a></td><td>plain</td></tr>
            "#,
        );
        assert_eq!(refs(&html), vec!["/right/cell"]);
    }
}
