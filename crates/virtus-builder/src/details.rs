// ABOUTME: Per-set detail helpers: parsing set counts and resizing detail lists
// ABOUTME: Keeps an exercise's detail list in step with its typed number of sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use virtus_core::constants::program::MAX_SETS;
use virtus_core::models::SetDetail;

/// Parse a typed set count from its leading integer ("3 séries" is 3, "2.5" is 2)
///
/// Input without leading digits or with a minus sign counts as zero. Counts
/// above [`MAX_SETS`] are clamped.
#[must_use]
pub fn parse_sets(raw: &str) -> usize {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('-') {
        return 0;
    }
    trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_usize, |count, digit| {
            count
                .saturating_mul(10)
                .saturating_add(usize::from(digit - b'0'))
                .min(MAX_SETS)
        })
}

/// Seed an empty detail list with one default detail
pub fn ensure_details(details: &mut Vec<SetDetail>) {
    if details.is_empty() {
        details.push(SetDetail::default());
    }
}

/// Grow by duplicating the last detail, or truncate, until `count` entries remain
pub fn resize_details(details: &mut Vec<SetDetail>, count: usize) {
    if count <= details.len() {
        details.truncate(count);
        return;
    }
    let template = details.last().cloned().unwrap_or_default();
    details.resize(count, template);
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtus_core::models::{Load, LoadUnit};

    fn heavy() -> SetDetail {
        SetDetail {
            reps: "5".into(),
            load: Load {
                value: "100".into(),
                unit: LoadUnit::Kg,
            },
            tempo: "3010".into(),
            rest: "180s".into(),
        }
    }

    #[test]
    fn test_parse_sets() {
        assert_eq!(parse_sets("4"), 4);
        assert_eq!(parse_sets(" 2 "), 2);
        assert_eq!(parse_sets(""), 0);
        assert_eq!(parse_sets("-3"), 0);
        assert_eq!(parse_sets("trois"), 0);
        assert_eq!(parse_sets("3 séries"), 3);
        assert_eq!(parse_sets("2.5"), 2);
        assert_eq!(parse_sets("+4"), 4);
        assert_eq!(parse_sets("-0"), 0);
    }

    #[test]
    fn test_parse_sets_clamps_huge_counts() {
        assert_eq!(parse_sets("100000000000000000"), MAX_SETS);
        assert_eq!(parse_sets("99999999999999999999999999"), MAX_SETS);
        assert_eq!(parse_sets(&MAX_SETS.to_string()), MAX_SETS);
        assert_eq!(parse_sets(&(MAX_SETS - 1).to_string()), MAX_SETS - 1);
    }

    #[test]
    fn test_resize_grows_from_last_detail() {
        let mut details = vec![SetDetail::default(), heavy()];
        resize_details(&mut details, 4);
        assert_eq!(details.len(), 4);
        assert_eq!(details[2], heavy());
        assert_eq!(details[3], heavy());
    }

    #[test]
    fn test_resize_truncates() {
        let mut details = vec![heavy(); 5];
        resize_details(&mut details, 2);
        assert_eq!(details.len(), 2);
        resize_details(&mut details, 0);
        assert!(details.is_empty());
    }

    #[test]
    fn test_resize_empty_uses_default() {
        let mut details = Vec::new();
        resize_details(&mut details, 2);
        assert_eq!(details, vec![SetDetail::default(); 2]);
    }
}
