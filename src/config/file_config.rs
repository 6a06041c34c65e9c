use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::user::PermissionGrant;
use crate::vocabulary::ProjectionPolicy;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub content_file: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub site_root: Option<String>,
    pub site_url: Option<String>,

    /// Vocabulary name to required permission. Replaces the built-in table.
    pub vocabularies: Option<HashMap<String, String>>,
    pub projection: Option<ProjectionPolicy>,
    pub users: Option<Vec<UserConfig>>,
    pub anonymous_permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UserConfig {
    pub user_id: String,
    pub token: String,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub grants: Vec<PermissionGrant>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
