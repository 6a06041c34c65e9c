use crate::user::UserStore;
use crate::vocabulary::VocabularyView;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub vocabulary_view: Arc<VocabularyView>,
    pub user_store: Arc<dyn UserStore>,
    /// Permissions held by requests that carry no token.
    pub anonymous_permissions: Arc<Vec<String>>,
}
