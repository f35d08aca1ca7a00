use anyhow::{Context, Result};
use inatcards_acquire::{InatClient, UrlKind};
use inatcards_anki::{AnkiClient, ModelStatus, PublishStatus};
use inatcards_model::Taxon;
use std::path::PathBuf;

/// Where each scraped taxon ends up.
#[derive(Debug)]
pub enum Sink {
    /// Save photos as `{dest}/{name}.{index}.{ext}`.
    Download { dest: PathBuf },
    /// Add one note per taxon through AnkiConnect.
    Anki {
        client: AnkiClient,
        deck: String,
        model: String,
        tags: Vec<String>,
    },
}

impl Sink {
    /// One-time setup before any URL is processed.
    pub async fn prepare(&self) -> Result<()> {
        match self {
            Sink::Download { dest } => {
                std::fs::create_dir_all(dest)
                    .with_context(|| format!("Failed to create {}", dest.display()))?;
            }
            Sink::Anki { client, model, .. } => {
                let status = client
                    .ensure_model(model)
                    .await
                    .with_context(|| format!("Failed to create note type '{model}'"))?;
                if status == ModelStatus::AlreadyExists {
                    tracing::info!(model = %model, "Using existing note type");
                }
            }
        }
        Ok(())
    }

    async fn accept(&self, inat: &InatClient, taxon: &Taxon) -> Result<()> {
        match self {
            Sink::Download { dest } => {
                inat.download_taxon_images(taxon, dest).await?;
            }
            Sink::Anki {
                client,
                deck,
                model,
                tags,
            } => {
                let status = client
                    .publish(taxon, deck, model, tags)
                    .await
                    .with_context(|| format!("Failed to publish {}", taxon.name))?;
                if status == PublishStatus::Duplicate {
                    tracing::debug!(taxon = %taxon.name, "Skipped duplicate note");
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Minimum observation count for a species to be included.
    pub min_count: u64,
    /// Stop each URL after this many taxa.
    pub limit: Option<usize>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub taxa: usize,
    pub failed_urls: Vec<String>,
}

/// Process every URL in order. A failing URL is logged and the run moves on.
pub async fn run(inat: &InatClient, sink: &Sink, urls: &[String], options: RunOptions) -> RunSummary {
    let mut summary = RunSummary::default();

    for url in urls {
        match process_url(inat, sink, url, options).await {
            Ok(taxa) => {
                tracing::info!(url = %url, taxa, "Finished URL");
                summary.taxa += taxa;
            }
            Err(e) => {
                tracing::error!(url = %url, "Failed to process URL: {e:#}");
                summary.failed_urls.push(url.clone());
            }
        }
    }

    summary
}

async fn process_url(inat: &InatClient, sink: &Sink, url: &str, options: RunOptions) -> Result<usize> {
    match UrlKind::classify(url) {
        UrlKind::Taxon => {
            let Some(taxon) = inat.fetch_taxon(url).await? else {
                tracing::warn!(url = %url, "Page has no taxon data");
                return Ok(0);
            };
            tracing::info!(taxon = %taxon.name, images = taxon.images.len(), "Found taxon");
            sink.accept(inat, &taxon).await?;
            Ok(1)
        }
        UrlKind::Observations => {
            let mut walk = inat.walk(url, options.min_count).await?;
            let mut taxa = 0;

            while options.limit.map_or(true, |limit| taxa < limit) {
                let Some(taxon) = walk.next().await else {
                    break;
                };
                tracing::info!(taxon = %taxon.name, images = taxon.images.len(), "Found taxon");
                taxa += 1;

                match sink.accept(inat, &taxon).await {
                    Ok(()) => {}
                    // A failed download only loses this taxon.
                    Err(e) if matches!(sink, Sink::Download { .. }) => {
                        tracing::warn!(taxon = %taxon.name, "Failed to download taxon, skipping: {e:#}");
                    }
                    Err(e) => return Err(e),
                }
            }

            Ok(taxa)
        }
        UrlKind::Unsupported => {
            anyhow::bail!("Not a taxon page or observations URL: {url}")
        }
    }
}
