// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Multi-table operations that need one transaction and an explicit acting coach
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services take the database and an [`ActorContext`](crate::context::ActorContext)
//! explicitly, so the same rules apply whatever the entry point.

/// Template-to-client program assignment
pub mod assignment;

pub use assignment::assign_program_to_client;
