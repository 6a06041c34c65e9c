//! Result slicing and projection into JSON-safe records.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::item::{Attribute, VocabularyItem};
use super::params::{AttributeSpec, BatchSpec};
use super::provider::Vocabulary;

/// Output key that is always filled from the path attribute.
pub const PATH_KEY: &str = "path";

pub type ProjectedItem = Map<String, Value>;

/// Which attributes projection may expose and which methods it may call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectionPolicy {
    /// Never emitted, even when requested.
    pub unsafe_metadata: Vec<String>,
    /// Methods that may be invoked. Any other method attribute is omitted.
    pub safe_callable_metadata: Vec<String>,
    /// Attribute read for the `path` key.
    pub path_attribute: String,
}

impl Default for ProjectionPolicy {
    fn default() -> Self {
        Self {
            unsafe_metadata: vec!["Creator".to_string(), "listCreators".to_string()],
            safe_callable_metadata: vec!["getURL".to_string(), "getPath".to_string()],
            path_attribute: "getPath".to_string(),
        }
    }
}

impl ProjectionPolicy {
    pub fn is_unsafe(&self, field: &str) -> bool {
        self.unsafe_metadata.iter().any(|f| f == field)
    }

    pub fn is_safe_callable(&self, field: &str) -> bool {
        self.safe_callable_metadata.iter().any(|f| f == field)
    }

    /// Projects `items`: `{id, text}` when `attributes` is empty, otherwise one
    /// entry per directive.
    pub fn project(
        &self,
        items: &[VocabularyItem],
        attributes: &AttributeSpec,
        base_path: &str,
    ) -> Vec<ProjectedItem> {
        if attributes.is_empty() {
            items.iter().map(default_projection).collect()
        } else {
            items
                .iter()
                .map(|item| self.project_item(item, attributes, base_path))
                .collect()
        }
    }

    /// Applies each directive in order; a later directive overwrites an
    /// earlier one writing the same key.
    pub fn project_item(
        &self,
        item: &VocabularyItem,
        attributes: &AttributeSpec,
        base_path: &str,
    ) -> ProjectedItem {
        let mut projected = ProjectedItem::new();
        for directive in attributes.iter() {
            let key = directive.key.as_str();
            if self.is_unsafe(&directive.field) {
                continue;
            }
            let field = if key == PATH_KEY {
                self.path_attribute.as_str()
            } else {
                directive.field.as_str()
            };

            let value = match item.value.attribute(field) {
                None => Value::Null,
                Some(Attribute::Data(value)) => value,
                Some(Attribute::Method(method)) => {
                    if !self.is_safe_callable(field) {
                        continue;
                    }
                    method()
                }
            };

            let value = if key == PATH_KEY {
                strip_base_path(value, base_path)
            } else {
                value
            };
            projected.insert(key.to_owned(), value);
        }
        projected
    }
}

fn default_projection(item: &VocabularyItem) -> ProjectedItem {
    let mut projected = ProjectedItem::new();
    projected.insert("id".to_string(), Value::String(item.token.clone()));
    projected.insert("text".to_string(), Value::String(item.title.clone()));
    projected
}

fn strip_base_path(value: Value, base_path: &str) -> Value {
    match value {
        Value::String(path) => {
            let stripped = path.strip_prefix(base_path).map(str::to_owned);
            Value::String(stripped.unwrap_or(path))
        }
        other => other,
    }
}

/// Applies `batch` when the vocabulary supports slicing; otherwise returns
/// every item.
pub fn paginate(vocabulary: Box<dyn Vocabulary>, batch: Option<&BatchSpec>) -> Vec<VocabularyItem> {
    if let Some(batch) = batch {
        let (start, end) = batch.range();
        if let Some(items) = vocabulary.slice(start, end) {
            return items;
        }
    }
    vocabulary.into_items()
}
