use serde::Serialize;

use super::projection::ProjectedItem;

/// The JSON body returned for every vocabulary lookup that is not a hard failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VocabularyResponse {
    Results {
        results: Vec<ProjectedItem>,
        total: usize,
    },
    /// The provider could not be invoked with the given input.
    Failed {
        results: Vec<ProjectedItem>,
        total: usize,
        error: bool,
    },
    /// Rejected before the provider was invoked.
    Error { error: String },
}

impl VocabularyResponse {
    pub fn results(results: Vec<ProjectedItem>, total: usize) -> Self {
        VocabularyResponse::Results { results, total }
    }

    pub fn failed() -> Self {
        VocabularyResponse::Failed {
            results: Vec::new(),
            total: 0,
            error: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        VocabularyResponse::Error {
            error: message.into(),
        }
    }

    /// Label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            VocabularyResponse::Results { .. } => "ok",
            VocabularyResponse::Failed { .. } => "soft_error",
            VocabularyResponse::Error { .. } => "error",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
