use serde::Serialize;

use super::permissions::PermissionGrant;
use crate::vocabulary::{PermissionChecker, RequestContext};

pub const ANONYMOUS_USER_ID: &str = "Anonymous User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: String,
    pub fullname: Option<String>,
    pub email: Option<String>,
    #[serde(skip)]
    pub grants: Vec<PermissionGrant>,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, grants: Vec<PermissionGrant>) -> Self {
        Self {
            user_id: user_id.into(),
            fullname: None,
            email: None,
            grants,
        }
    }

    pub fn anonymous(permissions: &[String]) -> Self {
        Self::new(
            ANONYMOUS_USER_ID,
            permissions.iter().map(PermissionGrant::global).collect(),
        )
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id == ANONYMOUS_USER_ID
    }

    pub fn display_name(&self) -> &str {
        self.fullname
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.user_id)
    }
}

impl PermissionChecker for Principal {
    fn check_permission(&self, permission: &str, context: &RequestContext) -> bool {
        self.grants
            .iter()
            .any(|grant| grant.grants(permission, context))
    }
}
