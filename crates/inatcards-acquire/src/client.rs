use crate::config::{InatEndpoints, USER_AGENT};
use crate::species_list::SpeciesWalk;
use crate::taxon_page;
use crate::types::{SpeciesCount, SpeciesCountsResponse};
use anyhow::{Context, Result};
use inatcards_model::Taxon;
use reqwest::Url;

/// HTTP access to iNaturalist pages and API.
///
/// Every request is awaited in turn; nothing here runs concurrently.
#[derive(Debug, Clone)]
pub struct InatClient {
    http: reqwest::Client,
    endpoints: InatEndpoints,
}

impl InatClient {
    pub fn new(endpoints: InatEndpoints) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, endpoints })
    }

    pub fn endpoints(&self) -> &InatEndpoints {
        &self.endpoints
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Fetch a taxon page and extract its [`Taxon`].
    ///
    /// `Ok(None)` means the page was served but carried no taxon data.
    pub async fn fetch_taxon(&self, url: &str) -> Result<Option<Taxon>> {
        tracing::debug!(url = %url, "Fetching taxon page");
        let html = self.fetch_page(url).await?;
        tracing::debug!(bytes = html.len(), "Received HTML");

        taxon_page::parse_taxon_page(&html).with_context(|| format!("Failed to parse {url}"))
    }

    /// Species counts for the filters in an observations search URL.
    ///
    /// The search URL's query string is forwarded unchanged to the API.
    pub async fn species_counts(&self, observations_url: &str) -> Result<Vec<SpeciesCount>> {
        let page = Url::parse(observations_url)
            .with_context(|| format!("Invalid observations URL: {observations_url}"))?;

        let mut api = Url::parse(&self.endpoints.species_counts_url())
            .context("Invalid species counts endpoint")?;
        api.set_query(page.query());

        tracing::info!(url = %api, "Fetching species counts");
        let response = self
            .http
            .get(api.clone())
            .send()
            .await
            .context("Failed to fetch species counts")?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "HTTP {status} for {api}");

        let body = response
            .text()
            .await
            .context("Failed to read species counts body")?;
        let counts: SpeciesCountsResponse =
            serde_json::from_str(&body).context("Failed to parse species counts")?;

        tracing::info!(taxa = counts.results.len(), "Received species counts");
        Ok(counts.results)
    }

    /// Start a lazy walk over the taxa of an observations search.
    ///
    /// The counts request happens here and its failure is returned; taxon
    /// pages are only fetched as [`SpeciesWalk::next`] is awaited.
    pub async fn walk(&self, observations_url: &str, min_count: u64) -> Result<SpeciesWalk<'_>> {
        let counts = self.species_counts(observations_url).await?;
        Ok(SpeciesWalk::new(self, counts, min_count))
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to fetch page")?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "HTTP {status} for {url}");

        response.text().await.context("Failed to read response body")
    }
}
