// ABOUTME: Core types shared by every Virtus crate
// ABOUTME: Errors, constants, and domain models with no server dependencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Virtus Core
//!
//! Foundation crate holding the error system, application constants, and the
//! workout program and assignment models.

/// Application constants
pub mod constants;
/// Unified error handling
pub mod errors;
/// Domain models
pub mod models;
