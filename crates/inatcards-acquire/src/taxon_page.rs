use crate::types::EmbeddedTaxonBlob;
use anyhow::{Context, Result};
use inatcards_model::Taxon;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Marker that identifies the script carrying the embedded taxon object.
const TAXON_MARKER: &str = "taxon:";

/// Greedy on purpose: the object runs to the last closing brace on the line.
static TAXON_BLOB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"taxon: (\{.*\})").expect("valid taxon regex"));

static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("valid selector"));

/// Extract a [`Taxon`] from the HTML of a taxon page.
///
/// The page embeds its data as a JavaScript object literal under `taxon:`
/// inside an inline script. Markup changes upstream only need to be handled
/// here.
///
/// Returns `Ok(None)` when the page carries no usable taxon data: no matching
/// script, no object after the marker, or an object without photos or names.
/// An object that is present but not valid JSON is an error.
pub fn parse_taxon_page(html: &str) -> Result<Option<Taxon>> {
    let Some(script) = find_taxon_script(html) else {
        tracing::debug!("No script with embedded taxon data");
        return Ok(None);
    };

    let Some(captures) = TAXON_BLOB.captures(&script) else {
        tracing::debug!("Taxon script found but no object literal matched");
        return Ok(None);
    };

    let blob: EmbeddedTaxonBlob =
        serde_json::from_str(&captures[1]).context("Failed to parse embedded taxon JSON")?;

    Ok(taxon_from_blob(blob))
}

/// Text of the first `<script>` whose content mentions the taxon marker.
fn find_taxon_script(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    document
        .select(&SCRIPT)
        .map(|script| script.text().collect::<String>())
        .find(|text| text.contains(TAXON_MARKER))
}

/// Map `results[0].taxon_photos` onto a [`Taxon`].
fn taxon_from_blob(blob: EmbeddedTaxonBlob) -> Option<Taxon> {
    let Some(result) = blob.results.into_iter().next() else {
        tracing::debug!("Embedded taxon data has no results");
        return None;
    };

    let photos = result.taxon_photos;
    let Some(first) = photos.first() else {
        tracing::debug!("Embedded taxon data has no photos");
        return None;
    };

    let name = first.taxon.preferred_common_name.clone()?;
    let scientific_name = first.taxon.name.clone()?;

    let images = photos
        .into_iter()
        .filter_map(|entry| entry.photo.medium_url)
        .collect();

    Some(Taxon {
        name,
        scientific_name,
        images,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(script_body: &str) -> String {
        format!(
            r#"
            <html><head>
            <script src="/assets/app.js"></script>
            <script>
              window.I18n = {{ locale: "en" }};
            </script>
            <script>
              {script_body}
            </script>
            </head><body><div id="app"></div></body></html>
            "#
        )
    }

    const MONARCH: &str = r#"var PRELOADED = {
      taxon: {"total_results":1,"results":[{"id":48662,"taxon_photos":[{"taxon":{"id":48662,"name":"Danaus plexippus","preferred_common_name":"Monarch"},"photo":{"id":1,"medium_url":"https://static.example.org/photos/1/medium.jpg"}},{"taxon":{"id":48662,"name":"Danaus plexippus","preferred_common_name":"Monarch"},"photo":{"id":2,"medium_url":"https://static.example.org/photos/2/medium.jpeg"}},{"taxon":{"id":48662,"name":"Danaus plexippus","preferred_common_name":"Monarch"},"photo":{"id":3,"medium_url":"https://static.example.org/photos/3/medium.jpg"}}]}]},
      currentUser: null
    };"#;

    #[test]
    fn test_parse_taxon_page() {
        let html = page(MONARCH);
        let taxon = parse_taxon_page(&html).unwrap().unwrap();

        assert_eq!(taxon.name, "Monarch");
        assert_eq!(taxon.scientific_name, "Danaus plexippus");
        assert_eq!(
            taxon.images,
            vec![
                "https://static.example.org/photos/1/medium.jpg",
                "https://static.example.org/photos/2/medium.jpeg",
                "https://static.example.org/photos/3/medium.jpg",
            ]
        );
    }

    #[test]
    fn test_names_come_from_first_photo() {
        let script = r#"taxon: {"results":[{"taxon_photos":[{"taxon":{"name":"Vulpes vulpes","preferred_common_name":"Red Fox"},"photo":{"medium_url":"https://x/1.jpg"}},{"taxon":{"name":"Vulpes lagopus","preferred_common_name":"Arctic Fox"},"photo":{"medium_url":"https://x/2.jpg"}}]}]}"#;
        let taxon = parse_taxon_page(&page(script)).unwrap().unwrap();

        assert_eq!(taxon.name, "Red Fox");
        assert_eq!(taxon.scientific_name, "Vulpes vulpes");
        assert_eq!(taxon.images, vec!["https://x/1.jpg", "https://x/2.jpg"]);
    }

    #[test]
    fn test_no_matching_script() {
        let html = page("console.log('nothing to see');");
        assert_eq!(parse_taxon_page(&html).unwrap(), None);
        assert_eq!(parse_taxon_page("").unwrap(), None);
    }

    #[test]
    fn test_marker_without_object() {
        // Marker present, but not followed by an object literal.
        let html = page("var config = { taxon: null };");
        assert_eq!(parse_taxon_page(&html).unwrap(), None);
    }

    #[test]
    fn test_empty_photo_list_is_absent() {
        let html = page(r#"taxon: {"results":[{"taxon_photos":[]}]}"#);
        assert_eq!(parse_taxon_page(&html).unwrap(), None);

        let html = page(r#"taxon: {"results":[]}"#);
        assert_eq!(parse_taxon_page(&html).unwrap(), None);
    }

    #[test]
    fn test_missing_common_name_is_absent() {
        let html = page(
            r#"taxon: {"results":[{"taxon_photos":[{"taxon":{"name":"Danaus plexippus"},"photo":{"medium_url":"https://x/1.jpg"}}]}]}"#,
        );
        assert_eq!(parse_taxon_page(&html).unwrap(), None);
    }

    #[test]
    fn test_photos_without_url_are_skipped() {
        let html = page(
            r#"taxon: {"results":[{"taxon_photos":[{"taxon":{"name":"Danaus plexippus","preferred_common_name":"Monarch"},"photo":{}},{"taxon":{"name":"Danaus plexippus","preferred_common_name":"Monarch"},"photo":{"medium_url":"https://x/2.jpg"}}]}]}"#,
        );
        let taxon = parse_taxon_page(&html).unwrap().unwrap();
        assert_eq!(taxon.name, "Monarch");
        assert_eq!(taxon.images, vec!["https://x/2.jpg"]);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let html = page(r#"taxon: {"results": [oops]}"#);
        assert!(parse_taxon_page(&html).is_err());
    }
}
