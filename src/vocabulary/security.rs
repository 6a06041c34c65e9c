//! Authorization gate: which vocabularies may be looked up, and with what permission.

use std::collections::HashMap;

use super::context::RequestContext;

pub const USERS_VOCABULARY: &str = "plone.app.vocabularies.Users";
pub const CATALOG_VOCABULARY: &str = "plone.app.vocabularies.Catalog";
pub const KEYWORDS_VOCABULARY: &str = "plone.app.vocabularies.Keywords";

pub const VIEW_PERMISSION: &str = "View";
pub const MODIFY_PORTAL_CONTENT_PERMISSION: &str = "Modify portal content";

/// Answers "may the current principal exercise `permission` on `context`".
pub trait PermissionChecker {
    fn check_permission(&self, permission: &str, context: &RequestContext) -> bool;
}

/// Allow-list of vocabulary names and the permission each one requires.
///
/// This table alone decides whether a name may be looked up; registering a
/// provider does not make it reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyPermissions {
    required: HashMap<String, String>,
}

impl VocabularyPermissions {
    pub fn new<I, N, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<String>,
    {
        Self {
            required: entries
                .into_iter()
                .map(|(name, permission)| (name.into(), permission.into()))
                .collect(),
        }
    }

    pub fn required_permission(&self, name: &str) -> Option<&str> {
        self.required.get(name).map(String::as_str)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.required.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for VocabularyPermissions {
    fn default() -> Self {
        Self::new([
            (USERS_VOCABULARY, MODIFY_PORTAL_CONTENT_PERMISSION),
            (CATALOG_VOCABULARY, VIEW_PERMISSION),
            (KEYWORDS_VOCABULARY, MODIFY_PORTAL_CONTENT_PERMISSION),
        ])
    }
}
