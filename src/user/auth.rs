use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct AuthTokenValue(pub String);

impl AuthTokenValue {
    /// Accepts either a bare token or an `Authorization: Bearer <token>` value.
    pub fn from_header(value: &str) -> Self {
        let value = value.trim();
        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .unwrap_or(value);
        AuthTokenValue(token.to_owned())
    }
}
