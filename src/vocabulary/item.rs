//! Vocabulary items and the attribute model projection reads from.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Zero-argument method exposed by an item value.
pub type AttributeMethod = Arc<dyn Fn() -> Value + Send + Sync>;

/// What reading an attribute off an item value yields.
#[derive(Clone)]
pub enum Attribute {
    /// Plain data, emitted as-is.
    Data(Value),
    /// A method. Only invoked when its name is on the safe-callable list.
    Method(AttributeMethod),
}

impl Attribute {
    pub fn method<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Attribute::Method(Arc::new(f))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Attribute::Method(_))
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Attribute::Method(_) => f.write_str("Method(..)"),
        }
    }
}

/// The object behind a vocabulary item.
pub trait ItemValue: Send + Sync {
    /// Looks up an attribute by name. `None` when the value has no such attribute.
    fn attribute(&self, name: &str) -> Option<Attribute>;
}

/// JSON objects expose their fields as data attributes; other JSON values expose nothing.
impl ItemValue for Value {
    fn attribute(&self, name: &str) -> Option<Attribute> {
        self.as_object()
            .and_then(|object| object.get(name))
            .cloned()
            .map(Attribute::Data)
    }
}

/// A single vocabulary entry.
#[derive(Clone)]
pub struct VocabularyItem {
    pub value: Arc<dyn ItemValue>,
    pub token: String,
    pub title: String,
}

impl VocabularyItem {
    pub fn new(
        value: Arc<dyn ItemValue>,
        token: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            value,
            token: token.into(),
            title: title.into(),
        }
    }

    /// Item whose value is a plain JSON value.
    pub fn simple(value: Value, token: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(Arc::new(value), token, title)
    }
}

impl fmt::Debug for VocabularyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VocabularyItem")
            .field("token", &self.token)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
