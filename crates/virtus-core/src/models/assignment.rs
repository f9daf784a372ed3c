// ABOUTME: Program assignment models linking a template to a client-owned copy
// ABOUTME: Defines assignment status lifecycle, client session status, and duplication results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a program assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Starts in the future
    Upcoming,
    /// Currently followed by the client
    #[default]
    Active,
    /// Finished
    Completed,
    /// Temporarily suspended
    Paused,
    /// Hidden from active views
    Archived,
}

impl AssignmentStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
            Self::Archived => "archived",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upcoming" => Some(Self::Upcoming),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "paused" => Some(Self::Paused),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Whether the assignment still counts as open (blocks a second assignment)
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Upcoming | Self::Active)
    }
}

/// Completion state of a session inside a client copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientSessionStatus {
    /// Not yet performed
    #[default]
    Pending,
    /// Performed by the client
    Completed,
}

impl ClientSessionStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Parse from database string representation, unknown values read as pending
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s == "completed" {
            Self::Completed
        } else {
            Self::Pending
        }
    }
}

/// A recorded assignment of a template program to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramAssignment {
    /// Assignment id
    pub id: String,
    /// Template the copy was made from
    pub program_template_id: String,
    /// Client-owned copy
    pub client_program_id: String,
    /// Client receiving the program
    pub client_id: String,
    /// Coach who assigned it
    pub coach_id: String,
    /// First day of the program
    pub start_date: NaiveDate,
    /// Planned last day, if known
    pub end_date: Option<NaiveDate>,
    /// Lifecycle status
    pub status: AssignmentStatus,
    /// Week the client is currently on (1-based)
    pub current_week: u32,
    /// Session order the client is currently on (1-based)
    pub current_session_order: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a successful assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignProgramResult {
    /// Newly created assignment id
    pub assignment_id: String,
    /// Newly created client program id
    pub client_program_id: String,
    /// Number of sessions copied
    pub sessions_copied: usize,
    /// Number of exercises copied
    pub exercises_copied: usize,
}

/// Progress statistics for an assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSummary {
    /// The assignment itself
    pub assignment: ProgramAssignment,
    /// Name of the client copy
    pub program_name: String,
    /// Weeks in the client copy
    pub week_count: u32,
    /// Sessions in the client copy
    pub total_sessions: u32,
    /// Sessions marked completed
    pub completed_sessions: u32,
    /// Completed / total, as a percentage rounded to one decimal
    pub progress_percentage: f64,
}

impl AssignmentSummary {
    /// Compute the progress percentage for a session tally
    #[must_use]
    pub fn percentage(completed: u32, total: u32) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (f64::from(completed) * 1000.0 / f64::from(total)).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_status_round_trip_and_openness() {
        for status in [
            AssignmentStatus::Upcoming,
            AssignmentStatus::Active,
            AssignmentStatus::Completed,
            AssignmentStatus::Paused,
            AssignmentStatus::Archived,
        ] {
            assert_eq!(AssignmentStatus::parse(status.as_str()), Some(status));
        }
        assert!(AssignmentStatus::Upcoming.is_open());
        assert!(!AssignmentStatus::Paused.is_open());
        assert_eq!(AssignmentStatus::parse("deleted"), None);
    }

    #[test]
    fn test_progress_percentage() {
        assert!((AssignmentSummary::percentage(1, 3) - 33.3).abs() < f64::EPSILON);
        assert!(AssignmentSummary::percentage(0, 0).abs() < f64::EPSILON);
        assert!((AssignmentSummary::percentage(4, 4) - 100.0).abs() < f64::EPSILON);
    }
}
