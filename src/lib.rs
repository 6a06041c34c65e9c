//! Vocabulary Server Library
//!
//! Looks up named vocabularies on behalf of remote widgets, filtered,
//! projected and paginated per request.

pub mod config;
pub mod content;
pub mod server;
pub mod user;
pub mod vocabulary;

// Re-export commonly used types for convenience
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig, ServerState};
pub use user::{InMemoryUserStore, UserStore};
pub use vocabulary::{VocabularyRegistry, VocabularyView};
