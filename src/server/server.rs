use anyhow::{Context, Result};
use std::future::IntoFuture;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, error, info};

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::metrics::{metrics_handler, record_vocabulary_lookup, set_registered_providers};
use super::session::Session;
use super::{log_requests, state::*, ServerConfig};
use crate::user::UserStore;
use crate::vocabulary::{RawVocabularyParams, VocabularyError, VocabularyView};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: &'static str,
    pub vocabularies: Vec<String>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let view = &state.vocabulary_view;
    let vocabularies = view
        .permissions()
        .names()
        .into_iter()
        .filter(|name| view.registry().get(name).is_some())
        .map(str::to_owned)
        .collect();
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
        vocabularies,
    })
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

async fn get_vocabulary(
    session: Session,
    State(state): State<ServerState>,
    params: Result<Query<RawVocabularyParams>, QueryRejection>,
) -> Response {
    match params {
        Ok(Query(params)) => lookup_vocabulary(&state, &session, &params, None),
        Err(rejection) => {
            debug!("Rejected vocabulary query string: {}", rejection.body_text());
            bad_request("Malformed query string")
        }
    }
}

async fn get_vocabulary_at(
    session: Session,
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<RawVocabularyParams>, QueryRejection>,
) -> Response {
    let path = match path {
        Ok(Path(path)) => path,
        Err(rejection) => {
            debug!("Rejected vocabulary context path: {}", rejection.body_text());
            return bad_request("Invalid context path");
        }
    };
    match params {
        Ok(Query(params)) => lookup_vocabulary(&state, &session, &params, Some(&path)),
        Err(rejection) => {
            debug!("Rejected vocabulary query string: {}", rejection.body_text());
            bad_request("Malformed query string")
        }
    }
}

fn lookup_vocabulary(
    state: &ServerState,
    session: &Session,
    params: &RawVocabularyParams,
    path: Option<&str>,
) -> Response {
    let view = &state.vocabulary_view;
    let Some(context) = state.config.context_for(path) else {
        debug!("Refusing context path with dot segments: {:?}", path);
        return bad_request("Invalid context path");
    };
    // Only allow-listed names become metric labels.
    let label = params
        .name
        .as_deref()
        .filter(|name| view.permissions().required_permission(name).is_some())
        .unwrap_or("unknown");

    match view.handle(params, &context, session) {
        Ok(response) => {
            record_vocabulary_lookup(label, response.outcome());
            Json(response).into_response()
        }
        Err(VocabularyError::Unauthorized(_)) => {
            record_vocabulary_lookup(label, "denied");
            StatusCode::FORBIDDEN.into_response()
        }
        Err(err @ VocabularyError::Decode(_)) => {
            record_vocabulary_lookup(label, "bad_request");
            debug!("Rejected vocabulary parameters: {:?}", err);
            bad_request(&err.to_string())
        }
        Err(err) => {
            error!("Unexpected vocabulary error ({}): {}", err.kind(), err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        vocabulary_view: VocabularyView,
        user_store: Arc<dyn UserStore>,
        anonymous_permissions: Vec<String>,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            vocabulary_view: Arc::new(vocabulary_view),
            user_store,
            anonymous_permissions: Arc::new(anonymous_permissions),
        }
    }
}

pub fn make_app(state: ServerState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/v1/vocabulary", get(get_vocabulary))
        .route("/v1/vocabulary/{*path}", get(get_vocabulary_at))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(
    config: ServerConfig,
    vocabulary_view: VocabularyView,
    user_store: Arc<dyn UserStore>,
    anonymous_permissions: Vec<String>,
) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;
    set_registered_providers(vocabulary_view.registry().provider_count());

    let state = ServerState::new(config, vocabulary_view, user_store, anonymous_permissions);
    let app = make_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(("0.0.0.0", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            result.context("HTTP server stopped")
        }
        result = axum::serve(metrics_listener, make_metrics_app()).into_future() => {
            result.context("Metrics server stopped")
        }
    }
}
