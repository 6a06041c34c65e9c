mod file_config;

pub use file_config::{FileConfig, UserConfig};

use crate::server::RequestsLoggingLevel;
use crate::user::{AuthTokenValue, InMemoryUserStore, Principal};
use crate::vocabulary::{ProjectionPolicy, VocabularyPermissions};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub content_file: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub site_root: String,
    pub site_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub content_file: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub site_root: String,
    pub site_url: String,

    pub permissions: VocabularyPermissions,
    pub projection: ProjectionPolicy,
    pub users: Vec<UserConfig>,
    pub anonymous_permissions: Vec<String>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let content_file = file
            .content_file
            .map(PathBuf::from)
            .or_else(|| cli.content_file.clone());
        if let Some(path) = &content_file {
            if !path.is_file() {
                bail!("Content file does not exist: {:?}", path);
            }
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let site_root = file.site_root.unwrap_or_else(|| cli.site_root.clone());
        if !site_root.starts_with('/') {
            bail!("site_root must be an absolute path, got {:?}", site_root);
        }
        let site_url = file.site_url.unwrap_or_else(|| cli.site_url.clone());

        let permissions = file
            .vocabularies
            .map(VocabularyPermissions::new)
            .unwrap_or_default();
        let projection = file.projection.unwrap_or_default();
        let users = file.users.unwrap_or_default();
        let anonymous_permissions = file
            .anonymous_permissions
            .unwrap_or_else(|| vec!["View".to_string()]);

        Ok(Self {
            content_file,
            port,
            metrics_port,
            logging_level,
            site_root,
            site_url,
            permissions,
            projection,
            users,
            anonymous_permissions,
        })
    }

    /// Builds the token table from the configured `[[users]]`.
    pub fn build_user_store(&self) -> Result<InMemoryUserStore> {
        let mut store = InMemoryUserStore::new();
        for user in &self.users {
            let mut principal = Principal::new(user.user_id.clone(), user.grants.clone());
            principal.fullname = user.fullname.clone();
            principal.email = user.email.clone();
            store
                .add_principal(principal, AuthTokenValue(user.token.clone()))
                .with_context(|| format!("Invalid user entry for {}", user.user_id))?;
        }
        Ok(store)
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
