use super::RequestsLoggingLevel;
use crate::vocabulary::RequestContext;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    /// Physical path of the site; vocabulary contexts are resolved beneath it.
    pub site_root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            metrics_port: 9091,
            site_root: "/plone".to_string(),
        }
    }
}

impl ServerConfig {
    /// The context for a request addressed to `path` below the site root.
    /// `None` when `path` would leave the tree it names.
    pub fn context_for(&self, path: Option<&str>) -> Option<RequestContext> {
        let site = RequestContext::from_path(&self.site_root);
        match path {
            Some(path) => site.child(path),
            None => Some(site),
        }
    }
}
