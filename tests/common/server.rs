//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own content and config files.

use super::constants::*;
use super::fixtures::create_test_site;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use vocabulary_server::config::{AppConfig, CliConfig, FileConfig};
use vocabulary_server::content::{register_vocabularies, ContentStore};
use vocabulary_server::{
    make_app, RequestsLoggingLevel, ServerConfig, ServerState, UserStore, VocabularyRegistry,
    VocabularyView,
};

/// Test server instance with isolated content and config
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_site_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port with the default config
    pub async fn spawn() -> Self {
        Self::spawn_with_config("").await
    }

    /// Spawns a new test server whose config file also contains `extra_toml`
    ///
    /// This function:
    /// 1. Writes the test content and config files to a temp directory
    /// 2. Resolves the config the same way the binary does
    /// 3. Binds to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if any of the above fails.
    pub async fn spawn_with_config(extra_toml: &str) -> Self {
        let (temp_site_dir, config_path) =
            create_test_site(extra_toml).expect("Failed to create test site");

        let file_config = FileConfig::load(&config_path).expect("Failed to load test config");
        let app_config = AppConfig::resolve(
            &CliConfig {
                logging_level: RequestsLoggingLevel::None,
                ..Default::default()
            },
            Some(file_config),
        )
        .expect("Failed to resolve test config");

        let content_path = app_config
            .content_file
            .clone()
            .expect("Test config has no content file");
        let content_store = ContentStore::load(&content_path, app_config.site_url.clone())
            .expect("Failed to load test content");
        let user_store: Arc<dyn UserStore> = Arc::new(
            app_config
                .build_user_store()
                .expect("Failed to build user store"),
        );

        let mut registry = VocabularyRegistry::new();
        register_vocabularies(&mut registry, Arc::new(content_store), user_store.clone());
        let view = VocabularyView::new(
            registry,
            app_config.permissions.clone(),
            app_config.projection.clone(),
        );

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            metrics_port: 0,
            site_root: app_config.site_root.clone(),
        };
        let app = make_app(ServerState::new(
            config,
            view,
            user_store,
            app_config.anonymous_permissions.clone(),
        ));

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _temp_site_dir: temp_site_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
