//! The vocabulary lookup pipeline.
//!
//! authorize → decode → invoke → paginate → project → envelope. Nothing is
//! kept between requests.

use tracing::{debug, warn};

use super::context::RequestContext;
use super::error::VocabularyError;
use super::params::{RawVocabularyParams, VocabularyRequest};
use super::projection::{paginate, ProjectionPolicy};
use super::provider::VocabularyProvider;
use super::registry::VocabularyRegistry;
use super::response::VocabularyResponse;
use super::security::{PermissionChecker, VocabularyPermissions};

pub struct VocabularyView {
    registry: VocabularyRegistry,
    permissions: VocabularyPermissions,
    projection: ProjectionPolicy,
}

impl VocabularyView {
    pub fn new(
        registry: VocabularyRegistry,
        permissions: VocabularyPermissions,
        projection: ProjectionPolicy,
    ) -> Self {
        Self {
            registry,
            permissions,
            projection,
        }
    }

    pub fn registry(&self) -> &VocabularyRegistry {
        &self.registry
    }

    pub fn permissions(&self) -> &VocabularyPermissions {
        &self.permissions
    }

    pub fn projection(&self) -> &ProjectionPolicy {
        &self.projection
    }

    /// Finds the provider for `name`, provided the name is allow-listed and
    /// the caller holds its permission on `context`.
    pub fn authorize(
        &self,
        name: Option<&str>,
        context: &RequestContext,
        checker: &dyn PermissionChecker,
    ) -> Result<&VocabularyProvider, VocabularyError> {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(VocabularyError::MissingParameter),
        };
        let permission = self
            .permissions
            .required_permission(name)
            .ok_or_else(|| VocabularyError::UnknownVocabulary(name.to_owned()))?;
        if !checker.check_permission(permission, context) {
            warn!(
                "Denied vocabulary {} on {}: missing permission '{}'",
                name,
                context.base_path(),
                permission
            );
            return Err(VocabularyError::Unauthorized(name.to_owned()));
        }
        self.registry
            .get(name)
            .ok_or_else(|| VocabularyError::ProviderNotFound(name.to_owned()))
    }

    /// Handles a request straight off the wire.
    ///
    /// Authorization runs before the remaining parameters are decoded, so a
    /// malformed parameter on a rejected vocabulary reports the rejection.
    pub fn handle(
        &self,
        params: &RawVocabularyParams,
        context: &RequestContext,
        checker: &dyn PermissionChecker,
    ) -> Result<VocabularyResponse, VocabularyError> {
        let name = params.name.as_deref();
        self.authorize(name, context, checker)
            .and_then(|provider| {
                let request = VocabularyRequest::decode(name.unwrap_or_default(), params)?;
                self.execute(provider, &request, context)
            })
            .or_else(into_envelope)
    }

    /// Handles an already decoded request.
    pub fn resolve(
        &self,
        request: &VocabularyRequest,
        context: &RequestContext,
        checker: &dyn PermissionChecker,
    ) -> Result<VocabularyResponse, VocabularyError> {
        self.authorize(Some(&request.name), context, checker)
            .and_then(|provider| self.execute(provider, request, context))
            .or_else(into_envelope)
    }

    fn execute(
        &self,
        provider: &VocabularyProvider,
        request: &VocabularyRequest,
        context: &RequestContext,
    ) -> Result<VocabularyResponse, VocabularyError> {
        debug!(
            "Invoking {} provider for {} (query: {}, batch: {:?})",
            provider.capability(),
            request.name,
            request.query.is_some(),
            request.batch
        );
        let invocation =
            provider.invoke(context, request.query.as_ref(), request.batch.as_ref())?;

        let total = invocation.vocabulary.len();
        let batch = if invocation.batch_applied {
            None
        } else {
            request.batch.as_ref()
        };
        let items = paginate(invocation.vocabulary, batch);
        let results = self
            .projection
            .project(&items, &request.attributes, &context.base_path());

        // Unknown (or zero) length falls back to the number of projected items,
        // which undercounts when a batch was applied.
        let total = total.filter(|total| *total > 0).unwrap_or(results.len());
        debug!("Vocabulary {} returned {} of {}", request.name, results.len(), total);
        Ok(VocabularyResponse::results(results, total))
    }
}

fn into_envelope(err: VocabularyError) -> Result<VocabularyResponse, VocabularyError> {
    match err {
        VocabularyError::Invocation(ref cause) => {
            warn!("Vocabulary provider invocation failed: {}", cause);
            Ok(VocabularyResponse::failed())
        }
        err if err.is_hard() => Err(err),
        err => {
            debug!("Vocabulary lookup rejected ({}): {}", err.kind(), err);
            Ok(VocabularyResponse::error(err.to_string()))
        }
    }
}
