//! Vocabulary provider registry
//!
//! Maps vocabulary names to providers. Being registered here does not make a
//! vocabulary reachable; see [`super::security::VocabularyPermissions`].

use std::collections::HashMap;

use super::provider::VocabularyProvider;

#[derive(Clone, Default)]
pub struct VocabularyRegistry {
    providers: HashMap<String, VocabularyProvider>,
}

impl VocabularyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider` under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, provider: VocabularyProvider) {
        self.providers.insert(name.into(), provider);
    }

    pub fn get(&self, name: &str) -> Option<&VocabularyProvider> {
        self.providers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}
