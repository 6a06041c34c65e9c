//! Request parameter decoding.
//!
//! Parameters arrive as text. A value that, once trimmed, is wrapped in `{}` or
//! `[]` is parsed as JSON; anything else is kept as plain text. This detection
//! is best-effort: plain text that happens to be bracketed is treated as JSON
//! and fails to decode. Callers that hold typed values should build a
//! [`VocabularyRequest`] directly instead of going through the text form.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::DecodeError;

/// The query string of a vocabulary request, undecoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVocabularyParams {
    pub name: Option<String>,
    pub query: Option<String>,
    pub attributes: Option<String>,
    pub batch: Option<String>,
}

/// A parameter after structured-data detection.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Structured(Value),
}

fn looks_structured(s: &str) -> bool {
    (s.starts_with('{') && s.ends_with('}')) || (s.starts_with('[') && s.ends_with(']'))
}

impl ParamValue {
    pub fn decode(param: &'static str, raw: &str) -> Result<Self, DecodeError> {
        let trimmed = raw.trim();
        if looks_structured(trimmed) {
            serde_json::from_str(trimmed)
                .map(ParamValue::Structured)
                .map_err(|source| DecodeError::Json { param, source })
        } else {
            Ok(ParamValue::Text(raw.to_owned()))
        }
    }

    /// Decodes an optional parameter; absent decodes to empty text.
    pub fn decode_optional(param: &'static str, raw: Option<&str>) -> Result<Self, DecodeError> {
        match raw {
            Some(raw) => Self::decode(param, raw),
            None => Ok(ParamValue::Text(String::new())),
        }
    }

    /// Inverse of [`ParamValue::decode`].
    pub fn encode(&self) -> String {
        match self {
            ParamValue::Text(text) => text.clone(),
            ParamValue::Structured(value) => value.to_string(),
        }
    }

    /// Empty text, `null`, `false`, zero, `{}` and `[]` are all empty.
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Text(text) => text.is_empty(),
            ParamValue::Structured(value) => !is_truthy(value),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Query handed to providers. Its shape is never interpreted here beyond the
/// convenience accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum VocabularyQuery {
    Text(String),
    Structured(Value),
}

impl VocabularyQuery {
    fn from_param(param: ParamValue) -> Option<Self> {
        if param.is_empty() {
            return None;
        }
        Some(match param {
            ParamValue::Text(text) => VocabularyQuery::Text(text),
            ParamValue::Structured(value) => VocabularyQuery::Structured(value),
        })
    }

    fn field(&self, name: &str) -> Option<&Value> {
        match self {
            VocabularyQuery::Text(_) => None,
            VocabularyQuery::Structured(value) => value.get(name),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            VocabularyQuery::Text(text) => Some(text),
            VocabularyQuery::Structured(_) => None,
        }
    }

    pub fn criteria(&self) -> Option<&Value> {
        self.field("criteria")
    }

    pub fn sort_on(&self) -> Option<&str> {
        self.field("sort_on").and_then(Value::as_str)
    }

    pub fn sort_order(&self) -> Option<&str> {
        self.field("sort_order").and_then(Value::as_str)
    }
}

/// One projection directive: `field`, or `key:field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDirective {
    /// Output key.
    pub key: String,
    /// Attribute read off the item value.
    pub field: String,
}

impl AttributeDirective {
    /// Splits on the first `:`; without one, key and field are the same.
    pub fn parse(directive: &str) -> Self {
        match directive.split_once(':') {
            Some((key, field)) => Self {
                key: key.to_owned(),
                field: field.to_owned(),
            },
            None => Self {
                key: directive.to_owned(),
                field: directive.to_owned(),
            },
        }
    }
}

/// Ordered projection directives. Empty means default `{id, text}` projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSpec(pub Vec<AttributeDirective>);

impl AttributeSpec {
    pub fn from_directives<I, S>(directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            directives
                .into_iter()
                .map(|d| AttributeDirective::parse(d.as_ref()))
                .collect(),
        )
    }

    fn from_param(param: ParamValue) -> Result<Self, DecodeError> {
        if param.is_empty() {
            return Ok(Self::default());
        }
        match param {
            ParamValue::Text(text) => Ok(Self::from_directives(text.split(','))),
            ParamValue::Structured(Value::Array(entries)) => entries
                .iter()
                .map(|entry| {
                    entry.as_str().ok_or_else(|| DecodeError::Shape {
                        param: "attributes",
                        reason: format!("expected a list of strings, found {}", entry),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::from_directives),
            ParamValue::Structured(other) => Err(DecodeError::Shape {
                param: "attributes",
                reason: format!("expected a list of strings, found {}", other),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeDirective> {
        self.0.iter()
    }
}

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSpec {
    pub page: usize,
    pub size: usize,
}

impl BatchSpec {
    /// Half-open index range covered by this page.
    pub fn range(&self) -> (usize, usize) {
        let start = self.page.saturating_sub(1).saturating_mul(self.size);
        (start, start.saturating_add(self.size))
    }

    /// A batch needs both `page` and `size`; anything partial disables batching.
    fn from_param(param: ParamValue) -> Result<Option<Self>, DecodeError> {
        let object = match param {
            ParamValue::Structured(Value::Object(object)) => object,
            _ => return Ok(None),
        };
        let (page, size) = match (object.get("page"), object.get("size")) {
            (Some(page), Some(size)) => (page, size),
            _ => return Ok(None),
        };
        Ok(Some(Self {
            page: positive_integer(&object, "page", page)?,
            size: positive_integer(&object, "size", size)?,
        }))
    }
}

fn positive_integer(
    object: &Map<String, Value>,
    field: &str,
    value: &Value,
) -> Result<usize, DecodeError> {
    value
        .as_u64()
        .filter(|n| *n > 0)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| DecodeError::Shape {
            param: "batch",
            reason: format!(
                "'{}' must be a positive integer in {}",
                field,
                Value::Object(object.clone())
            ),
        })
}

/// A fully decoded vocabulary request.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyRequest {
    pub name: String,
    pub query: Option<VocabularyQuery>,
    pub attributes: AttributeSpec,
    pub batch: Option<BatchSpec>,
}

impl VocabularyRequest {
    /// Request with no query, default projection and no batching.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: None,
            attributes: AttributeSpec::default(),
            batch: None,
        }
    }

    pub fn with_query(mut self, query: VocabularyQuery) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeSpec) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_batch(mut self, batch: BatchSpec) -> Self {
        self.batch = Some(batch);
        self
    }

    /// Decodes the text parameters of a request whose name is already known.
    pub fn decode(name: impl Into<String>, raw: &RawVocabularyParams) -> Result<Self, DecodeError> {
        let query = ParamValue::decode_optional("query", raw.query.as_deref())?;
        let attributes = ParamValue::decode_optional("attributes", raw.attributes.as_deref())?;
        let batch = ParamValue::decode_optional("batch", raw.batch.as_deref())?;

        Ok(Self {
            name: name.into(),
            query: VocabularyQuery::from_param(query),
            attributes: AttributeSpec::from_param(attributes)?,
            batch: BatchSpec::from_param(batch)?,
        })
    }
}
