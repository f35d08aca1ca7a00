use crate::client::InatClient;
use crate::types::SpeciesCount;
use inatcards_model::Taxon;
use std::collections::VecDeque;

/// Lazy, single-use walk over the taxa of a species-counts result.
///
/// Each call to [`next`](Self::next) fetches at most the taxon pages needed
/// to produce one [`Taxon`]. Stopping early is just not calling `next` again.
/// A failing taxon is logged and skipped; the walk never aborts.
#[derive(Debug)]
pub struct SpeciesWalk<'a> {
    client: &'a InatClient,
    pending: VecDeque<SpeciesCount>,
    min_count: u64,
}

impl<'a> SpeciesWalk<'a> {
    pub(crate) fn new(client: &'a InatClient, counts: Vec<SpeciesCount>, min_count: u64) -> Self {
        Self {
            client,
            pending: counts.into(),
            min_count,
        }
    }

    /// Number of species-count entries not yet considered.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub async fn next(&mut self) -> Option<Taxon> {
        while let Some(entry) = self.pending.pop_front() {
            let name = entry.taxon.display_name();

            if entry.count < self.min_count {
                tracing::info!(
                    taxon = %name,
                    count = entry.count,
                    min_count = self.min_count,
                    "Skipping rarely observed taxon"
                );
                continue;
            }

            let url = self.client.endpoints().taxon_page_url(entry.taxon.id);
            tracing::info!(taxon = %name, count = entry.count, url = %url, "Fetching taxon");

            match self.client.fetch_taxon(&url).await {
                Ok(Some(taxon)) => return Some(taxon),
                Ok(None) => {
                    tracing::info!(taxon = %name, url = %url, "No taxon data on page, skipping");
                }
                Err(e) => {
                    tracing::warn!(taxon = %name, url = %url, "Failed to fetch taxon, skipping: {e:#}");
                }
            }
        }

        None
    }
}
