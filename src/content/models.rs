use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::vocabulary::{Attribute, ItemValue};

/// One content object as stored in the content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_portal_type")]
    pub portal_type: String,
    #[serde(default)]
    pub review_state: Option<String>,
    #[serde(default)]
    pub subject: Vec<String>,
    #[serde(default)]
    pub creators: Vec<String>,
    #[serde(default)]
    pub uid: String,
}

/// Index names accepted by catalog filters and `sort_on`.
pub const CATALOG_INDEXES: &[&str] = &[
    "Title",
    "sortable_title",
    "Description",
    "portal_type",
    "review_state",
    "Subject",
    "UID",
    "id",
    "getId",
    "path",
    "SearchableText",
];

fn default_portal_type() -> String {
    "Document".to_string()
}

impl ContentRecord {
    /// Last path segment.
    pub fn id(&self) -> &str {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// Title, description and subjects, lowercased, for full-text matching.
    pub fn searchable_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.description);
        for subject in &self.subject {
            text.push(' ');
            text.push_str(subject);
        }
        text.to_lowercase()
    }

    /// Value of a catalog index, as used by filters and sorting.
    pub fn index_value(&self, index: &str) -> Option<Value> {
        let value = match index {
            "Title" | "sortable_title" => json!(self.title),
            "Description" => json!(self.description),
            "portal_type" => json!(self.portal_type),
            "review_state" => json!(self.review_state),
            "Subject" => json!(self.subject),
            "UID" => json!(self.uid),
            "id" | "getId" => json!(self.id()),
            "path" => json!(self.path),
            "SearchableText" => json!(self.searchable_text()),
            _ => return None,
        };
        Some(value)
    }
}

/// A content record as seen through a vocabulary item.
pub struct ContentObject {
    pub record: Arc<ContentRecord>,
    pub url: String,
}

impl ItemValue for ContentObject {
    fn attribute(&self, name: &str) -> Option<Attribute> {
        let record = &self.record;
        let attribute = match name {
            "Title" => Attribute::Data(json!(record.title)),
            "Description" => Attribute::Data(json!(record.description)),
            "portal_type" => Attribute::Data(json!(record.portal_type)),
            "review_state" => Attribute::Data(json!(record.review_state)),
            "Subject" => Attribute::Data(json!(record.subject)),
            "UID" => Attribute::Data(json!(record.uid)),
            "id" => Attribute::Data(json!(record.id())),
            "Creator" => Attribute::Data(json!(record.creators.first())),
            "getPath" => {
                let path = record.path.clone();
                Attribute::method(move || json!(path))
            }
            "getURL" => {
                let url = self.url.clone();
                Attribute::method(move || json!(url))
            }
            "listCreators" => {
                let creators = record.creators.clone();
                Attribute::method(move || json!(creators))
            }
            "getObject" => {
                let record = record.clone();
                Attribute::method(move || serde_json::to_value(&*record).unwrap_or(Value::Null))
            }
            _ => return None,
        };
        Some(attribute)
    }
}
