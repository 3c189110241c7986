use proptest::prelude::*;

use veil::name::{NAME_MAX, build_candidate, parse_identifier_flexible, sanitize_base_name};

fn is_valid_name(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= NAME_MAX
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

proptest! {
    #[test]
    fn test_sanitize_always_yields_valid_name(raw in ".*") {
        let sanitized = sanitize_base_name(&raw);
        prop_assert!(is_valid_name(&sanitized), "invalid: {sanitized:?}");
    }

    #[test]
    fn test_sanitize_is_deterministic(raw in ".*") {
        prop_assert_eq!(sanitize_base_name(&raw), sanitize_base_name(&raw));
    }

    #[test]
    fn test_candidates_stay_valid_across_attempt_budget(raw in ".*", attempt in 1u32..=25) {
        let base = sanitize_base_name(&raw);
        let candidate = build_candidate(&base, attempt);
        prop_assert!(is_valid_name(&candidate), "invalid: {candidate:?}");
        prop_assert_eq!(&candidate, &build_candidate(&base, attempt));
    }

    #[test]
    fn test_first_candidate_is_truncated_base(raw in "[A-Za-z0-9_]{1,32}") {
        let truncated: String = raw.chars().take(NAME_MAX).collect();
        prop_assert_eq!(build_candidate(&raw, 1), truncated);
    }

    #[test]
    fn test_identifier_parse_round_trips(bytes in any::<[u8; 16]>()) {
        let id = uuid::Uuid::from_bytes(bytes);

        let hyphenated = id.hyphenated().to_string();
        prop_assert_eq!(parse_identifier_flexible(&hyphenated), Some(id));

        let bare = id.simple().to_string();
        prop_assert_eq!(parse_identifier_flexible(&bare), Some(id));
    }

    #[test]
    fn test_identifier_parse_never_panics(s in ".*") {
        let _ = parse_identifier_flexible(&s);
    }
}
