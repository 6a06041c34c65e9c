use thiserror::Error;

/// A structured request parameter that looked like JSON but did not parse,
/// or parsed into the wrong shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The parser detail stays in `source` and out of the message.
    #[error("Malformed '{param}' parameter")]
    Json {
        param: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid '{param}' parameter: {reason}")]
    Shape {
        param: &'static str,
        reason: String,
    },
}

/// Raised by a provider when it cannot be called with what the request supplied.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Query syntax error: {0}")]
    QuerySyntax(String),

    /// The data behind the provider could not be read.
    #[error("Vocabulary source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("No factory provided.")]
    MissingParameter,

    #[error("Vocabulary lookup not allowed")]
    UnknownVocabulary(String),

    #[error("No factory with name \"{0}\" exists.")]
    ProviderNotFound(String),

    #[error("You do not have permission to use this vocabulary")]
    Unauthorized(String),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl VocabularyError {
    /// Hard errors are propagated to the transport; every other error is
    /// rendered as a JSON envelope.
    pub fn is_hard(&self) -> bool {
        matches!(
            self,
            VocabularyError::Unauthorized(_) | VocabularyError::Decode(_)
        )
    }

    /// Label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            VocabularyError::MissingParameter => "missing_parameter",
            VocabularyError::UnknownVocabulary(_) => "unknown_vocabulary",
            VocabularyError::ProviderNotFound(_) => "provider_not_found",
            VocabularyError::Unauthorized(_) => "unauthorized",
            VocabularyError::Invocation(_) => "invocation",
            VocabularyError::Decode(_) => "decode",
        }
    }
}
