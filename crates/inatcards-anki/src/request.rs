//! AnkiConnect request and response bodies.

use inatcards_model::{
    card_templates, note_fields, CardTemplate, Taxon, FIELD_NAME, FIELD_SCIENTIFIC_NAME,
    IMAGE_FIELDS, MAX_IMAGES, SOURCE_TAG,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const API_VERSION: u32 = 6;

#[derive(Debug, Serialize)]
pub struct Envelope<P> {
    pub action: &'static str,
    pub version: u32,
    pub params: P,
}

impl<P> Envelope<P> {
    pub fn new(action: &'static str, params: P) -> Self {
        Self {
            action,
            version: API_VERSION,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModelParams {
    pub model_name: String,
    pub in_order_fields: Vec<&'static str>,
    pub card_templates: Vec<CardTemplate>,
}

impl CreateModelParams {
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            in_order_fields: note_fields(),
            card_templates: card_templates(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddNoteParams {
    pub note: Note,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub deck_name: String,
    pub model_name: String,
    pub fields: BTreeMap<&'static str, String>,
    pub options: NoteOptions,
    pub tags: Vec<String>,
    pub picture: Vec<Picture>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    pub allow_duplicate: bool,
    pub duplicate_scope: &'static str,
}

/// A photo AnkiConnect downloads and appends to `fields`.
#[derive(Debug, Serialize)]
pub struct Picture {
    pub url: String,
    pub filename: String,
    pub fields: Vec<&'static str>,
}

impl Note {
    /// Build the note for `taxon`: names as text, at most four photos bound to
    /// "Image 1".."Image 4" in order, and the source tag ahead of `tags`.
    pub fn for_taxon(taxon: &Taxon, deck: &str, model: &str, tags: &[String]) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(FIELD_NAME, taxon.name.clone());
        fields.insert(FIELD_SCIENTIFIC_NAME, taxon.scientific_name.clone());

        let stem = taxon.normalized_name();
        let picture = taxon
            .images
            .iter()
            .take(MAX_IMAGES)
            .zip(IMAGE_FIELDS)
            .enumerate()
            .map(|(index, (url, field))| Picture {
                url: url.clone(),
                filename: format!("inaturalist_{stem}.{index}.{}", url_extension(url)),
                fields: vec![field],
            })
            .collect();

        let mut all_tags = vec![SOURCE_TAG.to_string()];
        all_tags.extend(tags.iter().cloned());

        Self {
            deck_name: deck.to_string(),
            model_name: model.to_string(),
            fields,
            options: NoteOptions {
                allow_duplicate: false,
                duplicate_scope: "deck",
            },
            tags: all_tags,
            picture,
        }
    }
}

/// Extension of the last path segment, `jpg` when there is none.
fn url_extension(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            let segment = u.path_segments()?.last()?.to_string();
            let (_, ext) = segment.rsplit_once('.')?;
            (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
        })
        .unwrap_or_else(|| "jpg".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxon_with_images(count: usize) -> Taxon {
        let images = (1..=count)
            .map(|i| format!("https://static.example.org/photos/{i}/medium.jpg"))
            .collect();
        Taxon::new("Red Fox", "Vulpes vulpes", images)
    }

    #[test]
    fn test_note_caps_pictures_at_four() {
        let note = Note::for_taxon(&taxon_with_images(6), "Mammals", "iNaturalist Taxon", &[]);

        assert_eq!(note.picture.len(), 4);
        for (i, picture) in note.picture.iter().enumerate() {
            assert_eq!(
                picture.url,
                format!("https://static.example.org/photos/{}/medium.jpg", i + 1)
            );
            assert_eq!(picture.fields, vec![IMAGE_FIELDS[i]]);
        }
        assert_eq!(note.picture[0].filename, "inaturalist_red_fox.0.jpg");
    }

    #[test]
    fn test_note_with_few_images() {
        let note = Note::for_taxon(&taxon_with_images(1), "Mammals", "iNaturalist Taxon", &[]);
        assert_eq!(note.picture.len(), 1);
        assert_eq!(note.picture[0].fields, vec!["Image 1"]);

        let bare = Note::for_taxon(&taxon_with_images(0), "Mammals", "iNaturalist Taxon", &[]);
        assert!(bare.picture.is_empty());
    }

    #[test]
    fn test_note_fields_and_tags() {
        let tags = vec!["mammals".to_string(), "ontario".to_string()];
        let note = Note::for_taxon(&taxon_with_images(2), "Mammals", "iNaturalist Taxon", &tags);

        assert_eq!(note.fields["Name"], "Red Fox");
        assert_eq!(note.fields["Scientific Name"], "Vulpes vulpes");
        assert_eq!(note.tags, vec!["inaturalist", "mammals", "ontario"]);
        assert!(!note.options.allow_duplicate);
        assert_eq!(note.options.duplicate_scope, "deck");
    }

    #[test]
    fn test_note_serializes_as_anki_expects() {
        let note = Note::for_taxon(&taxon_with_images(1), "Mammals", "iNaturalist Taxon", &[]);
        let json = serde_json::to_value(Envelope::new("addNote", AddNoteParams { note })).unwrap();

        assert_eq!(json["action"], "addNote");
        assert_eq!(json["version"], 6);
        assert_eq!(json["params"]["note"]["deckName"], "Mammals");
        assert_eq!(json["params"]["note"]["modelName"], "iNaturalist Taxon");
        assert_eq!(json["params"]["note"]["options"]["allowDuplicate"], false);
        assert_eq!(json["params"]["note"]["picture"][0]["fields"][0], "Image 1");
    }

    #[test]
    fn test_create_model_params() {
        let json = serde_json::to_value(CreateModelParams::new("iNaturalist Taxon")).unwrap();
        assert_eq!(json["modelName"], "iNaturalist Taxon");
        assert_eq!(json["inOrderFields"].as_array().unwrap().len(), 6);
        assert_eq!(json["cardTemplates"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("https://x.org/photos/1/medium.JPEG"), "jpeg");
        assert_eq!(url_extension("https://x.org/photos/1/medium.png?1234"), "png");
        assert_eq!(url_extension("https://x.org/photos/1/medium"), "jpg");
        assert_eq!(url_extension("not a url"), "jpg");
    }
}
