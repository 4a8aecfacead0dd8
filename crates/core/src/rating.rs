// crates/core/src/rating.rs
//! Rating math: scale normalization, free-text score parsing, rounding.
//!
//! Everything user-visible lives on a 0-10 scale with exactly one decimal.
//! The rounding rule is half-up (7.85 -> 7.9, 8.95 -> 9.0), and averages are
//! computed in integer tenths so the rule holds at midpoints regardless of
//! how the inputs happen to be represented as floats.

/// Round a value to one decimal for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Snap a rating to integer tenths (8.4 -> 84).
pub fn to_tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

/// Mean of `count` ratings whose tenths sum to `sum_tenths`, rounded half-up
/// to one decimal. `avg(10.0, 7.9)` is exactly 9.0 under this rule.
///
/// Returns 0.0 for an empty population; callers decide whether that case is
/// reachable.
pub fn mean_tenths(sum_tenths: i64, count: i64) -> f64 {
    if count <= 0 {
        return 0.0;
    }
    // floor((2s + c) / 2c) == round-half-up(s / c) for non-negative s.
    let mean = (2 * sum_tenths + count) / (2 * count);
    mean as f64 / 10.0
}

/// Clamp an already-numeric score into [0, 10] at one decimal.
///
/// Returns `None` for NaN/infinite input.
pub fn clamp_score(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    Some(round1(value.clamp(0.0, 10.0)))
}

/// Project an external rating onto the 0-10 scale.
///
/// Formula: `score / scale_max * 10`, clamped into [0, 10], one decimal.
///
/// Returns `None` when either input is non-finite or `scale_max <= 0`
/// (a degenerate scale says nothing about the game).
pub fn normalize_external_score(score: f64, scale_max: f64) -> Option<f64> {
    if !score.is_finite() || !scale_max.is_finite() || scale_max <= 0.0 {
        return None;
    }
    Some(round1((score / scale_max * 10.0).clamp(0.0, 10.0)))
}

/// Parse a score typed by the user, accepting comma or dot as the decimal
/// separator ("8,5" and "8.5" both parse to 8.5).
///
/// Returns `None` for empty or non-numeric input; numeric input is clamped
/// into [0, 10] at one decimal ("15" -> 10.0).
pub fn parse_score_input(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.replace(',', ".").parse().ok()?;
    clamp_score(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round1_snaps_to_one_decimal() {
        assert_eq!(round1(8.44), 8.4);
        assert_eq!(round1(8.45), 8.5);
        assert_eq!(round1(10.0), 10.0);
    }

    #[test]
    fn mean_tenths_is_half_up_at_midpoints() {
        // (10.0 + 7.9) / 2 = 8.95 -> 9.0, the documented midpoint case.
        let sum = to_tenths(10.0) + to_tenths(7.9);
        assert_eq!(mean_tenths(sum, 2), 9.0);

        // (8.0 + 8.1) / 2 = 8.05 -> 8.1.
        let sum = to_tenths(8.0) + to_tenths(8.1);
        assert_eq!(mean_tenths(sum, 2), 8.1);

        // Non-midpoint means are plain division.
        let sum = to_tenths(7.0) + to_tenths(8.0) + to_tenths(9.0);
        assert_eq!(mean_tenths(sum, 3), 8.0);
    }

    #[test]
    fn mean_tenths_empty_population_is_zero() {
        assert_eq!(mean_tenths(0, 0), 0.0);
    }

    #[test]
    fn clamp_score_bounds_and_rejects_non_finite() {
        assert_eq!(clamp_score(8.5), Some(8.5));
        assert_eq!(clamp_score(15.0), Some(10.0));
        assert_eq!(clamp_score(-2.0), Some(0.0));
        assert_eq!(clamp_score(f64::NAN), None);
        assert_eq!(clamp_score(f64::INFINITY), None);
    }

    #[test]
    fn normalize_projects_onto_ten_point_scale() {
        assert_eq!(normalize_external_score(84.0, 100.0), Some(8.4));
        assert_eq!(normalize_external_score(4.5, 5.0), Some(9.0));
        assert_eq!(normalize_external_score(10.0, 10.0), Some(10.0));
    }

    #[test]
    fn normalize_clamps_out_of_scale_scores() {
        assert_eq!(normalize_external_score(120.0, 100.0), Some(10.0));
        assert_eq!(normalize_external_score(-5.0, 100.0), Some(0.0));
    }

    #[test]
    fn normalize_rejects_degenerate_scales() {
        assert_eq!(normalize_external_score(8.0, 0.0), None);
        assert_eq!(normalize_external_score(8.0, -10.0), None);
        assert_eq!(normalize_external_score(f64::NAN, 100.0), None);
        assert_eq!(normalize_external_score(8.0, f64::INFINITY), None);
    }

    #[test]
    fn parse_accepts_comma_and_dot() {
        assert_eq!(parse_score_input("8,5"), Some(8.5));
        assert_eq!(parse_score_input("8.5"), Some(8.5));
        assert_eq!(parse_score_input(" 7.25 "), Some(7.3));
    }

    #[test]
    fn parse_clamps_into_range() {
        assert_eq!(parse_score_input("15"), Some(10.0));
        assert_eq!(parse_score_input("-2"), Some(0.0));
    }

    #[test]
    fn parse_rejects_empty_and_non_numeric() {
        assert_eq!(parse_score_input(""), None);
        assert_eq!(parse_score_input("   "), None);
        assert_eq!(parse_score_input("abc"), None);
        assert_eq!(parse_score_input("8,5,0"), None);
        // f64::from_str accepts "inf"; a score must still be finite.
        assert_eq!(parse_score_input("inf"), None);
    }
}
