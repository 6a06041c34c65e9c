use anyhow::{bail, Result};
use std::collections::HashMap;

use super::auth::AuthTokenValue;
use super::user_models::Principal;

pub trait UserStore: Send + Sync {
    /// Returns the principal owning the given token.
    /// Returns Ok(None) if the token is unknown.
    fn get_principal_by_token(&self, token: &AuthTokenValue) -> Result<Option<Principal>>;

    /// Returns all known principals, ordered by user id.
    fn get_all_principals(&self) -> Result<Vec<Principal>>;
}

/// User store backed by the principals listed in configuration.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    principals: HashMap<String, Principal>,
    tokens: HashMap<AuthTokenValue, String>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a principal reachable through `token`.
    /// Fails if either the user id or the token is already taken.
    pub fn add_principal(&mut self, principal: Principal, token: AuthTokenValue) -> Result<()> {
        if self.principals.contains_key(&principal.user_id) {
            bail!("Duplicate user id: {}", principal.user_id);
        }
        if self.tokens.contains_key(&token) {
            bail!("Duplicate token for user {}", principal.user_id);
        }
        self.tokens.insert(token, principal.user_id.clone());
        self.principals.insert(principal.user_id.clone(), principal);
        Ok(())
    }
}

impl UserStore for InMemoryUserStore {
    fn get_principal_by_token(&self, token: &AuthTokenValue) -> Result<Option<Principal>> {
        Ok(self
            .tokens
            .get(token)
            .and_then(|user_id| self.principals.get(user_id))
            .cloned())
    }

    fn get_all_principals(&self) -> Result<Vec<Principal>> {
        let mut principals: Vec<Principal> = self.principals.values().cloned().collect();
        principals.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(principals)
    }
}
