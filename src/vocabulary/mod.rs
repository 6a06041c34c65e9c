pub mod context;
pub mod error;
pub mod item;
pub mod params;
pub mod projection;
pub mod provider;
pub mod registry;
pub mod response;
pub mod security;
pub mod view;

pub use context::RequestContext;
pub use error::{DecodeError, InvocationError, VocabularyError};
pub use item::{Attribute, ItemValue, VocabularyItem};
pub use params::{
    AttributeDirective, AttributeSpec, BatchSpec, ParamValue, RawVocabularyParams,
    VocabularyQuery, VocabularyRequest,
};
pub use projection::{ProjectedItem, ProjectionPolicy};
pub use provider::{
    BatchVocabularyFactory, ContextVocabularyFactory, Invocation, QueryVocabularyFactory,
    SimpleVocabulary, Vocabulary, VocabularyProvider, VocabularyResult,
};
pub use registry::VocabularyRegistry;
pub use response::VocabularyResponse;
pub use security::{PermissionChecker, VocabularyPermissions};
pub use view::VocabularyView;
