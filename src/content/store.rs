//! Content records loaded from a JSON file.

use anyhow::{bail, Context, Result};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::models::{ContentObject, ContentRecord};
use crate::vocabulary::RequestContext;

pub struct ContentStore {
    records: Vec<Arc<ContentRecord>>,
    site_url: String,
}

impl ContentStore {
    /// Validates `records`: paths must be absolute and unique. A record
    /// without a UID gets its path as UID.
    pub fn new(records: Vec<ContentRecord>, site_url: impl Into<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut stored = Vec::with_capacity(records.len());
        for mut record in records {
            if !record.path.starts_with('/') {
                bail!("Content path '{}' is not absolute.", record.path);
            }
            if !seen.insert(record.path.clone()) {
                bail!("Content path '{}' appears more than once.", record.path);
            }
            if record.uid.is_empty() {
                record.uid = record.path.clone();
            }
            stored.push(Arc::new(record));
        }
        Ok(Self {
            records: stored,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn empty(site_url: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Reads a JSON array of records.
    pub fn load(path: &Path, site_url: impl Into<String>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read content file: {}", path.display()))?;
        let records: Vec<ContentRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse content file: {}", path.display()))?;
        let store = Self::new(records, site_url)?;
        info!(
            "Loaded {} content records from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records at or below `context`, in file order.
    pub fn records_under<'a>(
        &'a self,
        context: &'a RequestContext,
    ) -> impl Iterator<Item = &'a Arc<ContentRecord>> + 'a {
        self.records
            .iter()
            .filter(move |record| context.contains_path(&record.path))
    }

    pub fn object(&self, record: &Arc<ContentRecord>) -> ContentObject {
        ContentObject {
            record: record.clone(),
            url: format!("{}{}", self.site_url, record.path),
        }
    }

    /// Distinct subjects of every record, sorted.
    pub fn keywords(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|record| record.subject.iter().cloned())
            .collect()
    }
}
