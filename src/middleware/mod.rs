// ABOUTME: HTTP middleware for request tracing and cross-origin access
// ABOUTME: Provides request ID generation, per-request spans, and CORS configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS configuration
pub mod cors;
/// Request ids and spans
pub mod tracing;

pub use cors::setup_cors;
pub use self::tracing::{
    propagate_request_id_layer, request_trace_layer, set_request_id_layer, RequestSpan,
};
