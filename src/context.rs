// ABOUTME: Explicit acting-coach identity passed to services and extracted per request
// ABOUTME: Reads the X-Coach-Id header; a missing or blank header is an authentication error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Request identity
//!
//! Services never look up "the current user" on their own. Route handlers
//! extract an [`ActorContext`] and hand it down.

use crate::errors::AppError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};

/// Header carrying the acting coach id
pub const COACH_ID_HEADER: &str = "x-coach-id";

/// The coach on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    /// Acting coach id
    pub coach_id: String,
}

impl ActorContext {
    /// Build a context for a coach id
    #[must_use]
    pub fn new(coach_id: impl Into<String>) -> Self {
        Self {
            coach_id: coach_id.into(),
        }
    }

    /// Read the acting coach from request headers
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` if the header is absent, blank, or not valid text
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        headers
            .get(COACH_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Self::new)
            .ok_or_else(AppError::auth_required)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ActorContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_from_headers_trims_value() {
        let mut headers = HeaderMap::new();
        headers.insert(COACH_ID_HEADER, HeaderValue::from_static("  coach-1 "));
        let actor = ActorContext::from_headers(&headers).unwrap();
        assert_eq!(actor.coach_id, "coach-1");
    }

    #[test]
    fn test_missing_or_blank_header_is_rejected() {
        assert!(ActorContext::from_headers(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(COACH_ID_HEADER, HeaderValue::from_static("   "));
        assert!(ActorContext::from_headers(&headers).is_err());
    }
}
