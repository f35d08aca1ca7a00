//! The flashcard note type: field names and card templates.

use serde::Serialize;

pub const FIELD_NAME: &str = "Name";
pub const FIELD_SCIENTIFIC_NAME: &str = "Scientific Name";

/// Fields bound to pictures, in image order.
pub const IMAGE_FIELDS: [&str; 4] = ["Image 1", "Image 2", "Image 3", "Image 4"];

/// Maximum number of photos attached to a single note.
pub const MAX_IMAGES: usize = IMAGE_FIELDS.len();

/// Default tag applied to every note, ahead of user tags.
pub const SOURCE_TAG: &str = "inaturalist";

/// A card template as AnkiConnect expects it in `createModel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardTemplate {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Front")]
    pub front: String,
    #[serde(rename = "Back")]
    pub back: String,
}

/// All note fields in declaration order.
pub fn note_fields() -> Vec<&'static str> {
    let mut fields = vec![FIELD_NAME, FIELD_SCIENTIFIC_NAME];
    fields.extend(IMAGE_FIELDS);
    fields
}

/// One "photo -> name" card per image field, plus a
/// "scientific name -> common name" card.
///
/// Photo fronts are wrapped in a section tag so that notes with fewer than
/// four photos don't generate empty cards.
pub fn card_templates() -> Vec<CardTemplate> {
    let answer = format!(
        "{{{{FrontSide}}}}<hr id=answer>{{{{{FIELD_NAME}}}}}<br><i>{{{{{FIELD_SCIENTIFIC_NAME}}}}}</i>"
    );

    let mut templates: Vec<CardTemplate> = IMAGE_FIELDS
        .iter()
        .enumerate()
        .map(|(i, field)| CardTemplate {
            name: format!("Photo {}", i + 1),
            front: format!("{{{{#{field}}}}}{{{{{field}}}}}{{{{/{field}}}}}"),
            back: answer.clone(),
        })
        .collect();

    templates.push(CardTemplate {
        name: FIELD_SCIENTIFIC_NAME.to_string(),
        front: format!("<i>{{{{{FIELD_SCIENTIFIC_NAME}}}}}</i>"),
        back: format!(
            "{{{{FrontSide}}}}<hr id=answer>{{{{{FIELD_NAME}}}}}<br>{{{{{}}}}}",
            IMAGE_FIELDS[0]
        ),
    });

    templates
}
