use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnkiError {
    #[error("failed to reach AnkiConnect: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AnkiConnect returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("AnkiConnect {action} failed: {message}")]
    Api { action: &'static str, message: String },

    #[error("AnkiConnect {action} returned an unreadable response: {source}")]
    Decode {
        action: &'static str,
        source: serde_json::Error,
    },
}

impl AnkiError {
    /// `createModel` refused because a note type with that name exists.
    pub fn is_model_exists(&self) -> bool {
        self.api_message()
            .is_some_and(|m| m.contains("already exists"))
    }

    /// `addNote` refused because an equivalent note is already in the deck.
    pub fn is_duplicate(&self) -> bool {
        self.api_message().is_some_and(|m| m.contains("duplicate"))
    }

    // AnkiConnect only reports errors as free text, so these checks match
    // on its current wording.
    fn api_message(&self) -> Option<&str> {
        match self {
            AnkiError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}
