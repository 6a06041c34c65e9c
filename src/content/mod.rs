mod models;
mod query;
mod store;
mod vocabularies;

pub use models::{ContentObject, ContentRecord, CATALOG_INDEXES};
pub use query::{CatalogQuery, Filter, Operator};
pub use store::ContentStore;
pub use vocabularies::{
    register_vocabularies, CatalogVocabularyFactory, KeywordsVocabularyFactory,
    UsersVocabularyFactory,
};
