// ABOUTME: Application-wide constants for program editing, drafts, and assignments
// ABOUTME: Centralizes limits, default set parameters, sentinels, and storage key prefixes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Program structure limits
pub mod program {
    /// Minimum number of weeks in a program
    pub const MIN_WEEKS: u32 = 1;
    /// Maximum number of weeks in a program
    pub const MAX_WEEKS: u32 = 52;
    /// The week whose content acts as the template for later weeks
    pub const TEMPLATE_WEEK: u32 = 1;
    /// Default program name for a new template
    pub const DEFAULT_PROGRAM_NAME: &str = "Nouveau programme";
    /// Name prefix for generated sessions ("Séance 1", "Séance 2", ...)
    pub const SESSION_NAME_PREFIX: &str = "Séance";
    /// Number of sets given to a freshly added exercise
    pub const DEFAULT_NEW_EXERCISE_SETS: usize = 3;
    /// Upper bound on the set count of one exercise; larger typed counts are clamped
    pub const MAX_SETS: usize = 50;
}

/// Default per-set parameters
pub mod set_defaults {
    /// Default repetitions
    pub const REPS: &str = "12";
    /// Default load value (empty until the coach fills it)
    pub const LOAD_VALUE: &str = "";
    /// Default tempo notation
    pub const TEMPO: &str = "2010";
    /// Default rest between sets
    pub const REST: &str = "60s";
}

/// Intensification technique constants
pub mod intensification {
    /// Sentinel value meaning "no intensification technique"
    pub const NONE_SENTINEL: &str = "Aucune";
}

/// Draft persistence constants
pub mod drafts {
    /// Prefix applied to every draft key in the store
    pub const KEY_PREFIX: &str = "virtus_form_";
    /// Default time-to-live for a draft (24 hours)
    pub const DEFAULT_TTL_MS: i64 = 24 * 60 * 60 * 1000;
    /// Default debounce delay before an autosave is written
    pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
}

/// Assignment and client copy constants
pub mod assignments {
    /// Source type recorded on client programs created by assignment
    pub const SOURCE_COACH_ASSIGNED: &str = "coach_assigned";
    /// Week a new assignment starts on
    pub const INITIAL_WEEK: u32 = 1;
    /// Session order a new assignment starts on
    pub const INITIAL_SESSION_ORDER: u32 = 1;
}

/// Service identity used in logs
pub mod service_names {
    /// Name of the HTTP server
    pub const VIRTUS_SERVER: &str = "virtus-server";
}
