use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use ocv_model::Scheme;

use super::{Resolution, Resolver};

type Slot = Arc<OnceLock<Resolution>>;

/// Memoizes another resolver for the lifetime of one run.
///
/// Concurrent callers asking for the same key share one slot; the first
/// initializes it and the rest block on it, so the inner resolver sees each
/// key at most once.
pub struct CachedResolver<R> {
    inner: R,
    slots: DashMap<(Scheme, String), Slot>,
    lookups: AtomicUsize,
}

impl<R: Resolver> CachedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            slots: DashMap::new(),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of lookups forwarded to the inner resolver.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Number of distinct identifiers seen.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn key(scheme: Scheme, value: &str) -> (Scheme, String) {
        let value = value.trim();
        if scheme.is_case_insensitive() {
            (scheme, value.to_lowercase())
        } else {
            (scheme, value.to_string())
        }
    }
}

impl<R: Resolver> Resolver for CachedResolver<R> {
    fn supports(&self, scheme: Scheme) -> bool {
        self.inner.supports(scheme)
    }

    fn resolve(&self, scheme: Scheme, value: &str) -> Resolution {
        // Clone the slot out so the shard lock is released before the lookup.
        let slot: Slot = self
            .slots
            .entry(Self::key(scheme, value))
            .or_default()
            .clone();
        *slot.get_or_init(|| {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            let resolution = self.inner.resolve(scheme, value.trim());
            tracing::trace!(%scheme, value, ?resolution, "identifier resolved");
            resolution
        })
    }
}
