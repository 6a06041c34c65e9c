use super::state::ServerState;
use crate::user::{AuthTokenValue, Principal};
use crate::vocabulary::{PermissionChecker, RequestContext};

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{debug, error};

/// The caller of a request. Requests without a token are served as the
/// anonymous principal.
#[derive(Debug)]
pub struct Session {
    pub principal: Principal,
    pub token: Option<AuthTokenValue>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl PermissionChecker for Session {
    fn check_permission(&self, permission: &str, context: &RequestContext) -> bool {
        self.principal.check_permission(permission, context)
    }
}

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";

#[derive(Debug)]
pub enum SessionExtractionError {
    InvalidToken,
    InternalError,
}

impl IntoResponse for SessionExtractionError {
    fn into_response(self) -> axum::response::Response {
        match self {
            SessionExtractionError::InvalidToken => StatusCode::UNAUTHORIZED.into_response(),
            SessionExtractionError::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

fn extract_session_token_from_cookies(parts: &Parts) -> Option<AuthTokenValue> {
    CookieJar::from_headers(&parts.headers)
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(Cookie::value)
        .map(|s| AuthTokenValue(s.to_string()))
}

fn extract_session_token_from_headers(parts: &Parts) -> Option<AuthTokenValue> {
    parts
        .headers
        .get(HEADER_SESSION_TOKEN_KEY)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .map(|s| AuthTokenValue::from_header(&s))
}

fn extract_session_from_request_parts(
    parts: &Parts,
    ctx: &ServerState,
) -> Result<Session, SessionExtractionError> {
    let token = extract_session_token_from_cookies(parts)
        .or_else(|| extract_session_token_from_headers(parts))
        .filter(|token| !token.0.is_empty());

    let token = match token {
        None => {
            debug!("No token in cookies nor headers, serving anonymous.");
            return Ok(Session {
                principal: Principal::anonymous(&ctx.anonymous_permissions),
                token: None,
            });
        }
        Some(token) => token,
    };

    match ctx.user_store.get_principal_by_token(&token) {
        Ok(Some(principal)) => {
            debug!("Resolved session for user_id={}", principal.user_id);
            Ok(Session {
                principal,
                token: Some(token),
            })
        }
        Ok(None) => {
            debug!("Auth token not found");
            Err(SessionExtractionError::InvalidToken)
        }
        Err(e) => {
            error!("Failed to look up auth token: {}", e);
            Err(SessionExtractionError::InternalError)
        }
    }
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_session_from_request_parts(parts, ctx)
    }
}
