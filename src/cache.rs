//! Conversion result cache: real key derivation over an inert store.

use sha2::{Digest, Sha256};

use crate::models::{ConversionJob, ConvertResponse};

/// Cache key for a conversion: hash of the full job payload, so any change
/// to source, enrichment, format, or export params lands on a new key.
/// Label sets are ordered, which keeps the serialization canonical.
pub fn make_cache_key(job: &ConversionJob) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(job).unwrap_or_default());
    format!("{:x}", hasher.finalize())
}

/// Result store for identical conversion requests.
///
/// Only key derivation is wired up today: `get` always misses and `put`
/// drops its value, so every admitted request reaches a backend.
/// TODO: back this with a TTL store once eviction semantics are settled.
#[derive(Default)]
pub struct ResultCache;

impl ResultCache {
    pub fn new() -> Self {
        Self
    }

    pub fn get(&self, _key: &str) -> Option<ConvertResponse> {
        None
    }

    pub fn put(&self, _key: &str, _response: &ConvertResponse) {}
}
