//! Domain errors for the data layer, the store and the API handlers.

use thiserror::Error;

/// Message shown to users when the initial load (or a full reload) fails.
pub const LOAD_FAILED_MESSAGE: &str =
    "No se pudieron cargar los datos. Por favor intente nuevamente.";

#[derive(Error, Debug)]
pub enum ObservatoryError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl ObservatoryError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        ObservatoryError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ObservatoryError>;
