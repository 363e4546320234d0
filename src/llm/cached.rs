//! Caching decorator for analysis clients
//!
//! Wraps any [`AnalysisClient`] with the content-addressed
//! [`ResponseCache`]: read before call, write after call. A run replayed
//! with byte-identical inputs against a warm cache issues zero external
//! calls and produces byte-identical output.

use super::{AnalysisClient, AnalysisRequest, ClientError};
use crate::core::ResponseCache;

/// An [`AnalysisClient`] that consults the response cache first.
pub struct CachedClient<C: AnalysisClient> {
    inner: C,
    cache: ResponseCache,
}

impl<C: AnalysisClient> CachedClient<C> {
    pub fn new(inner: C, cache: ResponseCache) -> Self {
        Self { inner, cache }
    }
}

impl<C: AnalysisClient> AnalysisClient for CachedClient<C> {
    fn invoke(&self, request: &AnalysisRequest) -> Result<String, ClientError> {
        let fingerprint = request.fingerprint();
        if let Some(hit) = self.cache.lookup(&fingerprint) {
            return Ok(hit);
        }
        let response = self.inner.invoke(request)?;
        self.cache.store(&fingerprint, &response);
        Ok(response)
    }
}
