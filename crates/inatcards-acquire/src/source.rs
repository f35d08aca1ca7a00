/// What kind of iNaturalist page a user-supplied URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// A single taxon page, e.g. `https://www.inaturalist.org/taxa/48662`.
    Taxon,
    /// An observations search whose species list should be walked.
    Observations,
    Unsupported,
}

impl UrlKind {
    /// Classify by path substring. `/taxa` is checked first.
    pub fn classify(url: &str) -> Self {
        if url.contains("/taxa") {
            UrlKind::Taxon
        } else if url.contains("/observations") {
            UrlKind::Observations
        } else {
            UrlKind::Unsupported
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            UrlKind::classify("https://www.inaturalist.org/taxa/48662-Danaus-plexippus"),
            UrlKind::Taxon
        );
        assert_eq!(
            UrlKind::classify("https://www.inaturalist.org/observations?place_id=2&taxon_id=118451"),
            UrlKind::Observations
        );
        assert_eq!(
            UrlKind::classify("https://www.inaturalist.org/people/someone"),
            UrlKind::Unsupported
        );
    }

    #[test]
    fn test_taxa_wins() {
        assert_eq!(
            UrlKind::classify("https://www.inaturalist.org/taxa/1/observations"),
            UrlKind::Taxon
        );
    }
}
