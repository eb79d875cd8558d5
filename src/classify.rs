//! Activity classification and skip policy
//!
//! Turns the raw sport string a decoder surfaced (or failed to surface) into
//! the title-cased label embedded in output metadata, and decides whether a
//! label puts the whole file on the skip list. The skip set travels in
//! `ConvertOptions` rather than living as module state so library callers can
//! widen or empty it.

/// Activity labels whose files are skipped entirely, matched case-insensitively
pub const DEFAULT_SKIP_TYPES: [&str; 3] = ["unknown", "training", "swimming"];

/// Produce the activity label for a detected sport.
///
/// Absent input, including every upstream decode anomaly that prevented
/// detection, yields the literal `"Unknown"`.
pub fn classify_activity(sport: Option<&str>) -> String {
    match sport {
        Some(s) if !s.is_empty() => capitalize(s),
        _ => "Unknown".to_string(),
    }
}

/// Whether a label falls in the configured skip set
pub fn is_filtered(label: &str, skip_types: &[String]) -> bool {
    let lowered = label.to_lowercase();
    skip_types.iter().any(|t| t.to_lowercase() == lowered)
}

/// First character upper-cased, the rest lowered
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_skip_types() -> Vec<String> {
        DEFAULT_SKIP_TYPES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn labels_are_capitalized_whole() {
        assert_eq!(classify_activity(Some("running")), "Running");
        assert_eq!(classify_activity(Some("CYCLING")), "Cycling");
        assert_eq!(classify_activity(Some("fitness_equipment")), "Fitness_equipment");
    }

    #[test]
    fn missing_sport_is_unknown() {
        assert_eq!(classify_activity(None), "Unknown");
        assert_eq!(classify_activity(Some("")), "Unknown");
    }

    #[test]
    fn skip_matching_is_case_insensitive() {
        let skip = default_skip_types();
        assert!(is_filtered("Swimming", &skip));
        assert!(is_filtered("Unknown", &skip));
        assert!(is_filtered("TRAINING", &skip));
        assert!(!is_filtered("Running", &skip));
    }

    #[test]
    fn empty_skip_set_filters_nothing() {
        assert!(!is_filtered("Unknown", &[]));
    }
}
