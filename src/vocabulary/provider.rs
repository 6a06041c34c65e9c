//! Vocabulary providers and how they are called.
//!
//! Providers differ in what they accept. Each one declares its capability by
//! implementing one of three factory traits, and [`VocabularyProvider`] tags
//! which one it is so the caller can pick the right arguments.

use std::sync::Arc;

use super::context::RequestContext;
use super::error::InvocationError;
use super::item::VocabularyItem;
use super::params::{BatchSpec, VocabularyQuery};

pub type VocabularyResult = Result<Box<dyn Vocabulary>, InvocationError>;

/// An enumerable set of items produced by a provider.
pub trait Vocabulary: Send {
    /// Item count, when the vocabulary knows it without being consumed.
    fn len(&self) -> Option<usize> {
        None
    }

    /// Items in the half-open range `start..end`, or `None` when the
    /// vocabulary does not support slicing. Out-of-range bounds yield fewer
    /// (or no) items.
    fn slice(&self, _start: usize, _end: usize) -> Option<Vec<VocabularyItem>> {
        None
    }

    /// All items, in iteration order.
    fn into_items(self: Box<Self>) -> Vec<VocabularyItem>;
}

/// Vocabulary over an in-memory list with configurable capabilities.
pub struct SimpleVocabulary {
    items: Vec<VocabularyItem>,
    sized: bool,
    sliceable: bool,
    reported_len: Option<usize>,
}

impl SimpleVocabulary {
    /// Reports its length and supports slicing.
    pub fn sliceable(items: Vec<VocabularyItem>) -> Self {
        Self {
            items,
            sized: true,
            sliceable: true,
            reported_len: None,
        }
    }

    /// Reports its length but cannot be sliced.
    pub fn sized(items: Vec<VocabularyItem>) -> Self {
        Self {
            items,
            sized: true,
            sliceable: false,
            reported_len: None,
        }
    }

    /// Neither reports a length nor supports slicing.
    pub fn without_len(items: Vec<VocabularyItem>) -> Self {
        Self {
            items,
            sized: false,
            sliceable: false,
            reported_len: None,
        }
    }

    /// Reports `len` instead of the number of held items. Used by providers
    /// that already applied a batch and hold only one page.
    pub fn with_reported_len(mut self, len: usize) -> Self {
        self.reported_len = Some(len);
        self
    }
}

impl Vocabulary for SimpleVocabulary {
    fn len(&self) -> Option<usize> {
        if self.sized {
            Some(self.reported_len.unwrap_or(self.items.len()))
        } else {
            None
        }
    }

    fn slice(&self, start: usize, end: usize) -> Option<Vec<VocabularyItem>> {
        if !self.sliceable {
            return None;
        }
        let end = end.min(self.items.len());
        if start >= end {
            return Some(Vec::new());
        }
        Some(self.items[start..end].to_vec())
    }

    fn into_items(self: Box<Self>) -> Vec<VocabularyItem> {
        self.items
    }
}

/// Provider that only takes the context.
pub trait ContextVocabularyFactory: Send + Sync {
    fn create(&self, context: &RequestContext) -> VocabularyResult;
}

/// Provider that takes the context and an optional query.
pub trait QueryVocabularyFactory: Send + Sync {
    fn create(&self, context: &RequestContext, query: Option<&VocabularyQuery>) -> VocabularyResult;
}

/// Provider that takes the context, an optional query and an optional batch.
/// When it receives a batch it is expected to apply it itself.
pub trait BatchVocabularyFactory: Send + Sync {
    fn create(
        &self,
        context: &RequestContext,
        query: Option<&VocabularyQuery>,
        batch: Option<&BatchSpec>,
    ) -> VocabularyResult;
}

struct FnContextFactory<F>(F);

impl<F> ContextVocabularyFactory for FnContextFactory<F>
where
    F: Fn(&RequestContext) -> VocabularyResult + Send + Sync,
{
    fn create(&self, context: &RequestContext) -> VocabularyResult {
        (self.0)(context)
    }
}

struct FnQueryFactory<F>(F);

impl<F> QueryVocabularyFactory for FnQueryFactory<F>
where
    F: Fn(&RequestContext, Option<&VocabularyQuery>) -> VocabularyResult + Send + Sync,
{
    fn create(
        &self,
        context: &RequestContext,
        query: Option<&VocabularyQuery>,
    ) -> VocabularyResult {
        (self.0)(context, query)
    }
}

struct FnBatchFactory<F>(F);

impl<F> BatchVocabularyFactory for FnBatchFactory<F>
where
    F: Fn(&RequestContext, Option<&VocabularyQuery>, Option<&BatchSpec>) -> VocabularyResult
        + Send
        + Sync,
{
    fn create(
        &self,
        context: &RequestContext,
        query: Option<&VocabularyQuery>,
        batch: Option<&BatchSpec>,
    ) -> VocabularyResult {
        (self.0)(context, query, batch)
    }
}

/// A registered provider, tagged with its calling convention.
#[derive(Clone)]
pub enum VocabularyProvider {
    ContextOnly(Arc<dyn ContextVocabularyFactory>),
    ContextAndQuery(Arc<dyn QueryVocabularyFactory>),
    ContextQueryAndBatch(Arc<dyn BatchVocabularyFactory>),
}

/// What invoking a provider produced.
pub struct Invocation {
    pub vocabulary: Box<dyn Vocabulary>,
    /// True when the provider was handed the batch and applied it itself.
    pub batch_applied: bool,
}

impl VocabularyProvider {
    pub fn context_only<F>(f: F) -> Self
    where
        F: Fn(&RequestContext) -> VocabularyResult + Send + Sync + 'static,
    {
        VocabularyProvider::ContextOnly(Arc::new(FnContextFactory(f)))
    }

    pub fn context_and_query<F>(f: F) -> Self
    where
        F: Fn(&RequestContext, Option<&VocabularyQuery>) -> VocabularyResult
            + Send
            + Sync
            + 'static,
    {
        VocabularyProvider::ContextAndQuery(Arc::new(FnQueryFactory(f)))
    }

    pub fn context_query_and_batch<F>(f: F) -> Self
    where
        F: Fn(&RequestContext, Option<&VocabularyQuery>, Option<&BatchSpec>) -> VocabularyResult
            + Send
            + Sync
            + 'static,
    {
        VocabularyProvider::ContextQueryAndBatch(Arc::new(FnBatchFactory(f)))
    }

    pub fn capability(&self) -> &'static str {
        match self {
            VocabularyProvider::ContextOnly(_) => "context",
            VocabularyProvider::ContextAndQuery(_) => "context+query",
            VocabularyProvider::ContextQueryAndBatch(_) => "context+query+batch",
        }
    }

    /// Calls the provider with the arguments its capability accepts.
    ///
    /// The query (and batch) are only passed when a query is present; without
    /// one every provider is called with just the context.
    pub fn invoke(
        &self,
        context: &RequestContext,
        query: Option<&VocabularyQuery>,
        batch: Option<&BatchSpec>,
    ) -> Result<Invocation, InvocationError> {
        let (vocabulary, batch_applied) = match (self, query) {
            (VocabularyProvider::ContextQueryAndBatch(factory), Some(query)) => {
                (factory.create(context, Some(query), batch)?, batch.is_some())
            }
            (VocabularyProvider::ContextQueryAndBatch(factory), None) => {
                (factory.create(context, None, None)?, false)
            }
            (VocabularyProvider::ContextAndQuery(factory), query) => {
                (factory.create(context, query)?, false)
            }
            (VocabularyProvider::ContextOnly(factory), _) => (factory.create(context)?, false),
        };
        Ok(Invocation {
            vocabulary,
            batch_applied,
        })
    }
}
