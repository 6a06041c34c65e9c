use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vocabulary_server::config::{AppConfig, CliConfig, FileConfig};
use vocabulary_server::content::{register_vocabularies, ContentStore};
use vocabulary_server::server::metrics;
use vocabulary_server::{
    run_server, RequestsLoggingLevel, ServerConfig, UserStore, VocabularyRegistry, VocabularyView,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the JSON file holding the site content.
    #[clap(long, value_parser = parse_path)]
    pub content_file: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Physical path of the site root.
    #[clap(long, default_value = "/plone")]
    pub site_root: String,

    /// Public URL of the site, used to build content URLs.
    #[clap(long, default_value = "http://localhost:3001")]
    pub site_url: String,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            content_file: args.content_file.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            site_root: args.site_root.clone(),
            site_url: args.site_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&CliConfig::from(&cli_args), file_config)?;

    info!("Initializing metrics...");
    metrics::init_metrics();

    let content_store = match &app_config.content_file {
        Some(path) => ContentStore::load(path, app_config.site_url.clone())?,
        None => {
            info!("No content file given, serving an empty site.");
            ContentStore::empty(app_config.site_url.clone())
        }
    };
    let user_store: Arc<dyn UserStore> = Arc::new(app_config.build_user_store()?);
    info!(
        "Loaded {} principals",
        user_store.get_all_principals()?.len()
    );

    let mut registry = VocabularyRegistry::new();
    register_vocabularies(&mut registry, Arc::new(content_store), user_store.clone());
    let view = VocabularyView::new(
        registry,
        app_config.permissions.clone(),
        app_config.projection.clone(),
    );
    info!(
        "Serving vocabularies: {}",
        view.permissions().names().join(", ")
    );

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        metrics_port: app_config.metrics_port,
        site_root: app_config.site_root.clone(),
    };

    tokio::select! {
        result = run_server(
            server_config,
            view,
            user_store,
            app_config.anonymous_permissions.clone(),
        ) => {
            info!("HTTP server stopped: {:?}", result);
            result
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
