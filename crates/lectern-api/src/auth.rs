//! Caller identity extraction.
//!
//! The platform's edge authenticates requests before they reach the gateway;
//! what arrives here is an opaque bearer token treated as the caller's
//! subject. Requests without one are anonymous. Verifying or interpreting
//! the token stays the platform's job. The extracted [`Caller`] feeds the
//! access policy, which decides per object.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use lectern_core::Caller;

/// Caller context extracted from request headers.
///
/// Implemented over request parts (not an extension) so it composes with
/// `Multipart` handlers.
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub caller: Caller,
}

impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|subject| !subject.is_empty())
            .map(Caller::identified)
            .unwrap_or_else(Caller::anonymous);

        Ok(CallerContext { caller })
    }
}
