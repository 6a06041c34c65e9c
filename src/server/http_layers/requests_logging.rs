//! Request logging middleware

use super::super::state::ServerState;
use crate::server::metrics::{categorize_endpoint, record_http_request};
use axum::extract::State;
use axum::{
    body::Body,
    http::{
        header::{HeaderMap, CONTENT_LENGTH},
        Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
    Body,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

/// Declared body length, or why it could not be read.
fn declared_body_length(headers: &HeaderMap) -> Result<usize, &'static str> {
    headers
        .get(CONTENT_LENGTH)
        .ok_or("Content-length not set.")?
        .to_str()
        .map_err(|_| "Could not get Content-length string value.")?
        .parse::<usize>()
        .map_err(|_| "Could not parse Content-length numeric value.")
}

fn log_headers(label: &str, headers: &HeaderMap) {
    info!("  {} Headers:", label);
    for (name, value) in headers {
        info!("    {:?}: {:?}", name, value);
    }
}

/// Reads a body of `size` bytes for logging and hands back an equivalent one.
async fn buffer_body(body: Body, size: usize, label: &str) -> Result<Body, Response> {
    match axum::body::to_bytes(body, size).await {
        Ok(bytes) => {
            info!("  {} Body:\n{}", label, String::from_utf8_lossy(&bytes));
            Ok(Body::from(bytes))
        }
        Err(err) => {
            error!("Failed to read {} body: {:?}", label, err);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response())
        }
    }
}

pub async fn log_requests(
    State(state): State<ServerState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let level = state.config.requests_logging_level.clone();
    let start = Instant::now();

    let method = request.method().to_string();
    let uri = request.uri().to_string();
    let path = request.uri().path().to_string();

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", method, uri);
    }

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Req", request.headers());
    }

    if level >= RequestsLoggingLevel::Body {
        match declared_body_length(request.headers()) {
            Err(reason) => info!("  Req Body: {}", reason),
            Ok(size) if size < MAX_LOGGABLE_BODY_LENGTH => {
                let (parts, body) = request.into_parts();
                match buffer_body(body, size, "Req").await {
                    Ok(body) => request = Request::from_parts(parts, body),
                    Err(response) => return response,
                }
            }
            Ok(size) => info!(
                "  Req Body: Too big to log ({:#})",
                byte_unit::Byte::from(size)
            ),
        }
    }

    let mut response = next.run(request).await;

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Resp", response.headers());
    }

    if level >= RequestsLoggingLevel::Body {
        match declared_body_length(response.headers()) {
            Err(reason) => info!("  Resp Body: {}", reason),
            Ok(size) if size < MAX_LOGGABLE_BODY_LENGTH => {
                let (parts, body) = response.into_parts();
                match buffer_body(body, size, "Resp").await {
                    Ok(body) => response = Response::from_parts(parts, body),
                    Err(response) => return response,
                }
            }
            Ok(size) => info!(
                "  Resp Body: Too big to log ({:#})",
                byte_unit::Byte::from(size)
            ),
        }
    }

    let status = response.status().as_u16();
    let duration = start.elapsed();

    if level > RequestsLoggingLevel::None {
        info!("<<< {} ({}ms)", status, duration.as_millis());
    }

    record_http_request(&method, categorize_endpoint(&path), status, duration);

    response
}
