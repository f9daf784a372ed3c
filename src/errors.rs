// ABOUTME: Server-side error surface re-exported from the shared core crate
// ABOUTME: Keeps `crate::errors::AppError` paths stable across modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! Error codes, the `AppError` type, and HTTP response formatting live in
//! `virtus_core::errors` so the editor crate and the server share them.

pub use virtus_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse};
