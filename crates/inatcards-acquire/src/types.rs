//! Upstream JSON shapes.
//!
//! Only the fields we read are declared; everything is defaulted so a
//! missing key surfaces as an empty value instead of a parse failure.

use serde::Deserialize;

/// Response of `GET /observations/species_counts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeciesCountsResponse {
    #[serde(default)]
    pub results: Vec<SpeciesCount>,
}

/// One taxon and how many observations matched it.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesCount {
    pub count: u64,
    pub taxon: CountedTaxon,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountedTaxon {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub preferred_common_name: Option<String>,
}

impl CountedTaxon {
    /// Common name when there is one, scientific name otherwise.
    pub fn display_name(&self) -> &str {
        self.preferred_common_name.as_deref().unwrap_or(&self.name)
    }
}

/// The object embedded in a taxon page under `taxon:`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddedTaxonBlob {
    #[serde(default)]
    pub results: Vec<EmbeddedTaxonResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddedTaxonResult {
    #[serde(default)]
    pub taxon_photos: Vec<TaxonPhoto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxonPhoto {
    #[serde(default)]
    pub taxon: PhotoTaxon,
    #[serde(default)]
    pub photo: Photo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoTaxon {
    pub name: Option<String>,
    pub preferred_common_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Photo {
    pub medium_url: Option<String>,
}
