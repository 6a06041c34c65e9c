//! Catalog query evaluation.
//!
//! A structured query looks like
//! `{"criteria": [{"i": "portal_type", "o": "is", "v": "News Item"}], "sort_on": "Title"}`.
//! Operators may be given in their long form, e.g.
//! `plone.app.querystring.operation.string.contains`.

use serde_json::Value;
use std::sync::Arc;

use super::models::{ContentRecord, CATALOG_INDEXES};
use crate::vocabulary::{InvocationError, RequestContext, VocabularyQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Is,
    Contains,
    Path,
}

impl Operator {
    fn parse(operator: &str) -> Option<Self> {
        match operator.rsplit('.').next() {
            Some("is") => Some(Operator::Is),
            Some("contains") => Some(Operator::Contains),
            Some("path") => Some(Operator::Path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub index: String,
    pub operator: Operator,
    pub value: Value,
}

impl Filter {
    fn parse(criterion: &Value) -> Result<Self, InvocationError> {
        let index = criterion
            .get("i")
            .and_then(Value::as_str)
            .ok_or_else(|| InvocationError::QuerySyntax("criterion without index 'i'".into()))?;
        let operator = criterion
            .get("o")
            .and_then(Value::as_str)
            .ok_or_else(|| InvocationError::QuerySyntax("criterion without operator 'o'".into()))?;
        let operator = Operator::parse(operator).ok_or_else(|| {
            InvocationError::QuerySyntax(format!("unknown operator '{}'", operator))
        })?;
        if !CATALOG_INDEXES.contains(&index) {
            return Err(InvocationError::QuerySyntax(format!("unknown index '{}'", index)));
        }
        let value = criterion.get("v").cloned().unwrap_or(Value::Null);
        if matches!(operator, Operator::Contains | Operator::Path) && !value.is_string() {
            return Err(InvocationError::TypeMismatch(format!(
                "operator on '{}' expects a string value",
                index
            )));
        }
        Ok(Self {
            index: index.to_owned(),
            operator,
            value,
        })
    }

    fn matches(&self, record: &ContentRecord, context: &RequestContext) -> bool {
        let Some(actual) = record.index_value(&self.index) else {
            return false;
        };
        match self.operator {
            Operator::Is => {
                let actual = flatten(&actual);
                flatten(&self.value).iter().any(|wanted| actual.contains(wanted))
            }
            Operator::Contains => {
                let needle = self.value.as_str().unwrap_or_default().to_lowercase();
                flatten(&actual).iter().any(|value| {
                    value
                        .as_str()
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
                })
            }
            Operator::Path => {
                let wanted = self.value.as_str().unwrap_or_default();
                let scope = if wanted.starts_with('/') {
                    Some(RequestContext::from_path(wanted))
                } else {
                    context.child(wanted)
                };
                scope.is_some_and(|scope| scope.contains_path(&record.path))
            }
        }
    }
}

fn flatten(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(values) => values.iter().collect(),
        other => vec![other],
    }
}

fn sort_key(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.to_lowercase(),
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub filters: Vec<Filter>,
    pub sort_on: Option<String>,
    pub reverse: bool,
}

impl CatalogQuery {
    pub fn from_query(query: Option<&VocabularyQuery>) -> Result<Self, InvocationError> {
        let query = match query {
            None => return Ok(Self::default()),
            Some(VocabularyQuery::Text(text)) => {
                return Ok(Self {
                    filters: vec![Filter {
                        index: "SearchableText".to_string(),
                        operator: Operator::Contains,
                        value: Value::String(text.clone()),
                    }],
                    ..Self::default()
                })
            }
            Some(query) => query,
        };

        if !matches!(query, VocabularyQuery::Structured(Value::Object(_))) {
            return Err(InvocationError::TypeMismatch(
                "catalog query must be an object".to_string(),
            ));
        }

        let filters = match query.criteria() {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(criteria)) => criteria
                .iter()
                .map(Filter::parse)
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(InvocationError::TypeMismatch(
                    "criteria must be a list".to_string(),
                ))
            }
        };

        let sort_on = query.sort_on().map(str::to_owned);
        if let Some(index) = &sort_on {
            if !CATALOG_INDEXES.contains(&index.as_str()) {
                return Err(InvocationError::QuerySyntax(format!(
                    "cannot sort on unknown index '{}'",
                    index
                )));
            }
        }
        let reverse = matches!(
            query.sort_order(),
            Some("reverse" | "descending" | "reversed")
        );

        Ok(Self {
            filters,
            sort_on,
            reverse,
        })
    }

    pub fn matches(&self, record: &ContentRecord, context: &RequestContext) -> bool {
        self.filters
            .iter()
            .all(|filter| filter.matches(record, context))
    }

    /// Sorts by `sort_on` (stable), then reverses when asked to.
    pub fn sort(&self, records: &mut [Arc<ContentRecord>]) {
        if let Some(index) = &self.sort_on {
            records.sort_by_cached_key(|record| sort_key(record.index_value(index)));
        }
        if self.reverse {
            records.reverse();
        }
    }
}
