/// Default public site (taxon pages live under `/taxa/{id}`).
pub const DEFAULT_SITE_URL: &str = "https://www.inaturalist.org";

/// Default API root (species counts live under `/observations/species_counts`).
pub const DEFAULT_API_URL: &str = "https://api.inaturalist.org/v1";

/// Species seen fewer times than this are skipped during a list walk.
pub const DEFAULT_MIN_COUNT: u64 = 10;

pub const USER_AGENT: &str = concat!("inatcards/", env!("CARGO_PKG_VERSION"), " (taxon flashcard tool)");

/// Where taxon pages and the observations API are served from.
///
/// Passed into [`crate::InatClient`] so tests can point it at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InatEndpoints {
    pub site_url: String,
    pub api_url: String,
}

impl InatEndpoints {
    pub fn new(site_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            site_url: trim_slash(site_url.into()),
            api_url: trim_slash(api_url.into()),
        }
    }

    pub fn taxon_page_url(&self, taxon_id: u64) -> String {
        format!("{}/taxa/{taxon_id}", self.site_url)
    }

    pub fn species_counts_url(&self) -> String {
        format!("{}/observations/species_counts", self.api_url)
    }
}

impl Default for InatEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_URL, DEFAULT_API_URL)
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let endpoints = InatEndpoints::default();
        assert_eq!(endpoints.taxon_page_url(118451), "https://www.inaturalist.org/taxa/118451");
        assert_eq!(
            endpoints.species_counts_url(),
            "https://api.inaturalist.org/v1/observations/species_counts"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let endpoints = InatEndpoints::new("http://127.0.0.1:9000/", "http://127.0.0.1:9000/api//");
        assert_eq!(endpoints.taxon_page_url(7), "http://127.0.0.1:9000/taxa/7");
        assert_eq!(
            endpoints.species_counts_url(),
            "http://127.0.0.1:9000/api/observations/species_counts"
        );
    }
}
