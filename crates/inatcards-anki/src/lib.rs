pub mod error;
pub mod request;

pub use error::AnkiError;

use inatcards_model::Taxon;
use request::{AddNoteParams, CreateModelParams, Envelope, Note, Reply};
use serde::Serialize;

/// AnkiConnect's default listen address.
pub const DEFAULT_ANKI_URL: &str = "http://localhost:8765";

pub const DEFAULT_DECK: &str = "Default";
pub const DEFAULT_MODEL: &str = "iNaturalist Taxon";

/// Outcome of [`AnkiClient::ensure_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Created,
    AlreadyExists,
}

/// Outcome of [`AnkiClient::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Added { note_id: Option<u64> },
    Duplicate,
}

/// Publishes taxon notes through AnkiConnect.
#[derive(Debug, Clone)]
pub struct AnkiClient {
    http: reqwest::Client,
    url: String,
}

impl AnkiClient {
    pub fn new(url: impl Into<String>) -> Result<Self, AnkiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Create the taxon note type. An existing note type of that name counts
    /// as success.
    pub async fn ensure_model(&self, model_name: &str) -> Result<ModelStatus, AnkiError> {
        match self
            .invoke("createModel", CreateModelParams::new(model_name))
            .await
        {
            Ok(_) => {
                tracing::info!(model = %model_name, "Created note type");
                Ok(ModelStatus::Created)
            }
            Err(e) if e.is_model_exists() => {
                tracing::debug!(model = %model_name, "Note type already exists");
                Ok(ModelStatus::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    /// Add a note for `taxon` to `deck`. A duplicate note counts as success.
    pub async fn publish(
        &self,
        taxon: &Taxon,
        deck: &str,
        model: &str,
        tags: &[String],
    ) -> Result<PublishStatus, AnkiError> {
        let note = Note::for_taxon(taxon, deck, model, tags);
        let pictures = note.picture.len();

        match self.invoke("addNote", AddNoteParams { note }).await {
            Ok(result) => {
                let note_id = result.as_u64();
                tracing::info!(
                    taxon = %taxon.name,
                    deck = %deck,
                    pictures,
                    note_id = ?note_id,
                    "Added note"
                );
                Ok(PublishStatus::Added { note_id })
            }
            Err(e) if e.is_duplicate() => {
                tracing::info!(taxon = %taxon.name, deck = %deck, "Note already in deck");
                Ok(PublishStatus::Duplicate)
            }
            Err(e) => Err(e),
        }
    }

    async fn invoke<P: Serialize>(
        &self,
        action: &'static str,
        params: P,
    ) -> Result<serde_json::Value, AnkiError> {
        tracing::debug!(url = %self.url, action, "Calling AnkiConnect");
        let response = self
            .http
            .post(&self.url)
            .json(&Envelope::new(action, params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnkiError::Status(status));
        }

        let body = response.text().await?;
        let reply: Reply =
            serde_json::from_str(&body).map_err(|source| AnkiError::Decode { action, source })?;

        match reply.error {
            Some(message) => Err(AnkiError::Api { action, message }),
            None => Ok(reply.result),
        }
    }
}
