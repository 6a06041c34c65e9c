use serde::{Deserialize, Serialize};

use crate::vocabulary::RequestContext;

/// A permission held by a principal, optionally limited to a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub permission: String,
    /// Physical path the grant is limited to. `None` grants it everywhere.
    #[serde(default)]
    pub scope: Option<String>,
}

impl PermissionGrant {
    pub fn global(permission: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
            scope: None,
        }
    }

    pub fn scoped(permission: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
            scope: Some(scope.into()),
        }
    }

    pub fn grants(&self, permission: &str, context: &RequestContext) -> bool {
        if self.permission != permission {
            return false;
        }
        match &self.scope {
            None => true,
            Some(scope) => RequestContext::from_path(scope).contains_path(&context.base_path()),
        }
    }
}
