//! External identifier resolution.
//!
//! A [`Resolver`] answers whether an identifier exists in an external
//! knowledge base. The engine always talks to it through a
//! [`CachedResolver`], so each distinct identifier is looked up at most once
//! per run no matter how many rows or threads ask for it.

mod cache;
mod http;

pub use cache::CachedResolver;
pub use http::HttpResolver;

use ocv_model::Scheme;
use serde::Serialize;

/// Outcome of one external lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The identifier exists.
    Known,
    /// The knowledge base answered and does not know the identifier.
    Unknown,
    /// No answer could be obtained (timeout, transport error, server error).
    LookupFailed,
}

/// Source of truth for identifier existence.
pub trait Resolver: Send + Sync {
    /// Whether this resolver can look up identifiers of `scheme` at all.
    fn supports(&self, scheme: Scheme) -> bool;

    /// Look up the local part of an identifier.
    fn resolve(&self, scheme: Scheme, value: &str) -> Resolution;
}

/// Resolver used when external checks are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResolver;

impl Resolver for OfflineResolver {
    fn supports(&self, _scheme: Scheme) -> bool {
        false
    }

    fn resolve(&self, _scheme: Scheme, _value: &str) -> Resolution {
        Resolution::LookupFailed
    }
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn supports(&self, scheme: Scheme) -> bool {
        (**self).supports(scheme)
    }

    fn resolve(&self, scheme: Scheme, value: &str) -> Resolution {
        (**self).resolve(scheme, value)
    }
}

impl<R: Resolver + ?Sized> Resolver for Box<R> {
    fn supports(&self, scheme: Scheme) -> bool {
        (**self).supports(scheme)
    }

    fn resolve(&self, scheme: Scheme, value: &str) -> Resolution {
        (**self).resolve(scheme, value)
    }
}
