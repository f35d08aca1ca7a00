use unicode_normalization::UnicodeNormalization;

/// A species scraped from a taxon page, ready to be turned into cards.
///
/// `images` holds photo URLs in page order; the first one is the primary
/// photo. It can be empty or shorter than four entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxon {
    /// Preferred common name (e.g., "Monarch").
    pub name: String,
    /// Scientific name (e.g., "Danaus plexippus").
    pub scientific_name: String,
    pub images: Vec<String>,
}

impl Taxon {
    pub fn new(
        name: impl Into<String>,
        scientific_name: impl Into<String>,
        images: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            scientific_name: scientific_name.into(),
            images,
        }
    }

    /// File-name stem derived from the common name.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Lower-case a common name and replace spaces with underscores.
///
/// The input is NFC-normalized first so that names with accents produce the
/// same file name regardless of how upstream encoded them.
pub fn normalize_name(name: &str) -> String {
    let nfc: String = name.nfc().collect();
    nfc.replace(' ', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Eastern Gray Squirrel"), "eastern_gray_squirrel");
        assert_eq!(normalize_name("Monarch"), "monarch");
    }

    #[test]
    fn test_normalize_name_nfc() {
        // e + combining acute accent -> é (precomposed)
        assert_eq!(normalize_name("Cafe\u{0301} Moth"), "café_moth");
    }
}
