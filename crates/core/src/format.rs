// crates/core/src/format.rs
//! Display formatting shared by the API and the frontend copy.

/// Humanize a minute total: "45min", "2h", "3h 25min".
///
/// Negative totals render as "0min" (they only arise from clock skew).
pub fn format_minutes(total: i64) -> String {
    let total = total.max(0);
    let hours = total / 60;
    let minutes = total % 60;
    if hours == 0 {
        format!("{minutes}min")
    } else if minutes == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {minutes:02}min")
    }
}

/// One-decimal score with a comma decimal separator ("8,5"), pt-BR style.
/// Missing scores render as a dash.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(value) => format!("{value:.1}").replace('.', ","),
        None => "–".to_string(),
    }
}
