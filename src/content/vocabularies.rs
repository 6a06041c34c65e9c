//! Vocabularies backed by the content store and the user store.

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use super::query::CatalogQuery;
use super::store::ContentStore;
use crate::user::UserStore;
use crate::vocabulary::security::{CATALOG_VOCABULARY, KEYWORDS_VOCABULARY, USERS_VOCABULARY};
use crate::vocabulary::{
    BatchSpec, BatchVocabularyFactory, ContextVocabularyFactory, InvocationError,
    QueryVocabularyFactory, RequestContext, SimpleVocabulary, Vocabulary, VocabularyItem,
    VocabularyProvider, VocabularyQuery, VocabularyRegistry, VocabularyResult,
};

/// Content objects at or below the context, filtered and sorted by the query.
pub struct CatalogVocabularyFactory {
    store: Arc<ContentStore>,
}

impl CatalogVocabularyFactory {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }
}

impl BatchVocabularyFactory for CatalogVocabularyFactory {
    fn create(
        &self,
        context: &RequestContext,
        query: Option<&VocabularyQuery>,
        batch: Option<&BatchSpec>,
    ) -> VocabularyResult {
        let query = CatalogQuery::from_query(query)?;
        let mut records: Vec<_> = self
            .store
            .records_under(context)
            .filter(|record| query.matches(record, context))
            .cloned()
            .collect();
        query.sort(&mut records);

        let total = records.len();
        let records = match batch {
            Some(batch) => {
                let (start, end) = batch.range();
                let end = end.min(total);
                if start < end {
                    records[start..end].to_vec()
                } else {
                    Vec::new()
                }
            }
            None => records,
        };
        debug!(
            "Catalog matched {} records under {}, returning {}",
            total,
            context.base_path(),
            records.len()
        );

        let items = records
            .iter()
            .map(|record| {
                VocabularyItem::new(
                    Arc::new(self.store.object(record)),
                    record.uid.clone(),
                    record.title.clone(),
                )
            })
            .collect();
        Ok(Box::new(SimpleVocabulary::sliceable(items).with_reported_len(total)))
    }
}

/// Distinct subjects used across the site.
pub struct KeywordsVocabularyFactory {
    store: Arc<ContentStore>,
}

impl KeywordsVocabularyFactory {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }
}

impl QueryVocabularyFactory for KeywordsVocabularyFactory {
    fn create(
        &self,
        _context: &RequestContext,
        query: Option<&VocabularyQuery>,
    ) -> VocabularyResult {
        let filter = match query {
            None => None,
            Some(VocabularyQuery::Text(text)) => Some(text.as_str()),
            Some(query) => match query.criteria() {
                None => None,
                Some(criteria) => Some(criteria.as_str().ok_or_else(|| {
                    InvocationError::TypeMismatch("keyword criteria must be text".to_string())
                })?),
            },
        }
        .map(str::to_lowercase);

        let items = self
            .store
            .keywords()
            .into_iter()
            .filter(|keyword| {
                filter
                    .as_ref()
                    .map_or(true, |filter| keyword.to_lowercase().contains(filter))
            })
            .map(|keyword| VocabularyItem::simple(json!(keyword), keyword.clone(), keyword))
            .collect();
        Ok(Box::new(SimpleVocabulary::sized(items)))
    }
}

/// Every known principal.
pub struct UsersVocabularyFactory {
    user_store: Arc<dyn UserStore>,
}

impl UsersVocabularyFactory {
    pub fn new(user_store: Arc<dyn UserStore>) -> Self {
        Self { user_store }
    }
}

impl ContextVocabularyFactory for UsersVocabularyFactory {
    fn create(&self, _context: &RequestContext) -> VocabularyResult {
        let principals = self.user_store.get_all_principals().map_err(|err| {
            error!("Failed to list principals: {}", err);
            InvocationError::Unavailable(err.to_string())
        })?;
        let items = principals
            .into_iter()
            .map(|principal| {
                VocabularyItem::simple(
                    json!({
                        "id": principal.user_id,
                        "fullname": principal.fullname,
                        "email": principal.email,
                    }),
                    principal.user_id.clone(),
                    principal.display_name().to_owned(),
                )
            })
            .collect();
        Ok(Box::new(SimpleVocabulary::without_len(items)) as Box<dyn Vocabulary>)
    }
}

/// Registers the catalog, keywords and users vocabularies.
pub fn register_vocabularies(
    registry: &mut VocabularyRegistry,
    store: Arc<ContentStore>,
    user_store: Arc<dyn UserStore>,
) {
    registry.register(
        CATALOG_VOCABULARY,
        VocabularyProvider::ContextQueryAndBatch(Arc::new(CatalogVocabularyFactory::new(
            store.clone(),
        ))),
    );
    registry.register(
        KEYWORDS_VOCABULARY,
        VocabularyProvider::ContextAndQuery(Arc::new(KeywordsVocabularyFactory::new(store))),
    );
    registry.register(
        USERS_VOCABULARY,
        VocabularyProvider::ContextOnly(Arc::new(UsersVocabularyFactory::new(user_store))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentRecord;
    use crate::user::{AuthTokenValue, InMemoryUserStore, Principal};
    use anyhow::{bail, Result};

    fn record(path: &str, title: &str, subject: &[&str]) -> ContentRecord {
        ContentRecord {
            path: path.to_string(),
            title: title.to_string(),
            description: String::new(),
            portal_type: "Document".to_string(),
            review_state: None,
            subject: subject.iter().map(|s| s.to_string()).collect(),
            creators: Vec::new(),
            uid: format!("uid-{}", title),
        }
    }

    fn store() -> Arc<ContentStore> {
        let records = (1..=12)
            .map(|i| {
                record(
                    &format!("/plone/news/item-{:02}", i),
                    &format!("Item {:02}", i),
                    if i % 2 == 0 { &["Even"] } else { &["odd"] },
                )
            })
            .chain(std::iter::once(record("/plone/events/party", "Party", &["Fun"])))
            .collect();
        Arc::new(ContentStore::new(records, "http://localhost:3001").unwrap())
    }

    fn tokens(items: &[VocabularyItem]) -> Vec<String> {
        items.iter().map(|i| i.token.clone()).collect()
    }

    #[test]
    fn catalog_is_scoped_to_context() {
        let factory = CatalogVocabularyFactory::new(store());
        let vocabulary = factory
            .create(&RequestContext::from_path("/plone/events"), None, None)
            .unwrap();
        assert_eq!(vocabulary.len(), Some(1));
        assert_eq!(tokens(&vocabulary.into_items()), vec!["uid-Party"]);
    }

    #[test]
    fn catalog_applies_batch_and_reports_full_length() {
        let factory = CatalogVocabularyFactory::new(store());
        let query = VocabularyQuery::Text("item".to_string());
        let vocabulary = factory
            .create(
                &RequestContext::from_path("/plone"),
                Some(&query),
                Some(&BatchSpec { page: 2, size: 5 }),
            )
            .unwrap();
        assert_eq!(vocabulary.len(), Some(12));
        assert_eq!(
            tokens(&vocabulary.into_items()),
            (6..=10).map(|i| format!("uid-Item {:02}", i)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn catalog_batch_past_end_is_empty() {
        let factory = CatalogVocabularyFactory::new(store());
        let vocabulary = factory
            .create(
                &RequestContext::from_path("/plone"),
                Some(&VocabularyQuery::Text("item".into())),
                Some(&BatchSpec { page: 9, size: 5 }),
            )
            .unwrap();
        assert_eq!(vocabulary.len(), Some(12));
        assert!(vocabulary.into_items().is_empty());
    }

    #[test]
    fn catalog_propagates_query_errors() {
        let factory = CatalogVocabularyFactory::new(store());
        let query = VocabularyQuery::Structured(json!({"criteria": {"i": "Title"}}));
        let result = factory.create(&RequestContext::from_path("/plone"), Some(&query), None);
        assert!(matches!(result, Err(InvocationError::TypeMismatch(_))));
    }

    #[test]
    fn keywords_are_filtered_case_insensitively() {
        let factory = KeywordsVocabularyFactory::new(store());
        let context = RequestContext::from_path("/plone");

        let all = factory.create(&context, None).unwrap();
        assert_eq!(all.len(), Some(3));
        assert_eq!(tokens(&all.into_items()), vec!["Even", "Fun", "odd"]);

        let query = VocabularyQuery::Text("E".to_string());
        assert_eq!(
            tokens(&factory.create(&context, Some(&query)).unwrap().into_items()),
            vec!["Even"]
        );

        let query = VocabularyQuery::Structured(json!({"criteria": "UN"}));
        assert_eq!(
            tokens(&factory.create(&context, Some(&query)).unwrap().into_items()),
            vec!["Fun"]
        );

        let query = VocabularyQuery::Structured(json!({"criteria": [1]}));
        assert!(matches!(
            factory.create(&context, Some(&query)),
            Err(InvocationError::TypeMismatch(_))
        ));
    }

    #[test]
    fn users_vocabulary_lists_principals() {
        let mut users = InMemoryUserStore::new();
        let mut editor = Principal::new("editor", Vec::new());
        editor.fullname = Some("Edith Editor".to_string());
        users
            .add_principal(editor, AuthTokenValue("t1".to_string()))
            .unwrap();
        users
            .add_principal(Principal::new("admin", Vec::new()), AuthTokenValue("t2".to_string()))
            .unwrap();

        let factory = UsersVocabularyFactory::new(Arc::new(users));
        let vocabulary = factory.create(&RequestContext::from_path("/plone")).unwrap();
        assert_eq!(vocabulary.len(), None);
        let items = vocabulary.into_items();
        assert_eq!(tokens(&items), vec!["admin", "editor"]);
        assert_eq!(items[1].title, "Edith Editor");
    }

    struct BrokenUserStore;

    impl UserStore for BrokenUserStore {
        fn get_principal_by_token(&self, _token: &AuthTokenValue) -> Result<Option<Principal>> {
            bail!("offline")
        }

        fn get_all_principals(&self) -> Result<Vec<Principal>> {
            bail!("offline")
        }
    }

    #[test]
    fn users_store_failure_is_an_invocation_error() {
        let factory = UsersVocabularyFactory::new(Arc::new(BrokenUserStore));
        assert!(matches!(
            factory.create(&RequestContext::from_path("/plone")),
            Err(InvocationError::Unavailable(_))
        ));
    }

    #[test]
    fn registers_all_three() {
        let mut registry = VocabularyRegistry::new();
        register_vocabularies(&mut registry, store(), Arc::new(InMemoryUserStore::new()));
        assert_eq!(
            registry.get(CATALOG_VOCABULARY).map(|p| p.capability()),
            Some("context+query+batch")
        );
        assert_eq!(
            registry.get(KEYWORDS_VOCABULARY).map(|p| p.capability()),
            Some("context+query")
        );
        assert_eq!(
            registry.get(USERS_VOCABULARY).map(|p| p.capability()),
            Some("context")
        );
    }
}
