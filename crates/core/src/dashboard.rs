// crates/core/src/dashboard.rs
//! Pure derivation of the statistics dashboard from cycle rows.
//!
//! `derive_dashboard` is deliberately free of clocks and I/O: the server
//! fetches rows, this module folds them. Labels are pt-BR to match the
//! product ("Sem status", "Fev/24"); the bucket ordering is recovered by
//! parsing labels back into calendar positions rather than trusting map
//! iteration order.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::rating::{mean_tenths, round1, to_tenths};
use crate::types::CycleStatRow;

/// Breakdown label for cycles without a status.
pub const NO_STATUS_LABEL: &str = "Sem status";

/// pt-BR month abbreviations, January first.
pub const PT_MONTHS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Filter the dashboard was derived under. Pinning both year and month
/// switches the rating trend from month buckets to day buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilter {
    pub year: Option<i32>,
    /// 1-12.
    pub month: Option<u32>,
}

impl DashboardFilter {
    /// Day-bucket mode requires both a year and a month.
    pub fn is_day_mode(&self) -> bool {
        self.year.is_some() && self.month.is_some()
    }
}

/// Headline numbers across the filtered cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub cycles: i64,
    pub rated_cycles: i64,
    /// `None` when no cycle carries a rating; never NaN.
    pub avg_cycle_rating: Option<f64>,
    pub total_minutes: i64,
    pub total_sessions: i64,
}

/// One rating-trend bucket: "05/01" in day mode, "Fev/24" in month mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub label: String,
    /// Mean rating of the bucket, one decimal.
    pub value: f64,
    pub count: i64,
}

/// One slice of the status breakdown, most common first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct StatusSlice {
    pub status: String,
    pub total: i64,
}

/// One histogram column. The histogram always carries buckets 0..=10,
/// empty or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    pub bucket: u8,
    pub total: i64,
}

/// Everything the statistics screen renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub kpis: DashboardKpis,
    pub rating_trend: Vec<TrendPoint>,
    pub status_breakdown: Vec<StatusSlice>,
    pub rating_histogram: Vec<HistogramBucket>,
}

/// Fold cycle rows into the dashboard. Pure and total: absent aggregates
/// count as zero, unrated cycles contribute to counts but never to rating
/// buckets, and an empty input yields zeroed KPIs plus the 11 empty
/// histogram buckets.
pub fn derive_dashboard(rows: &[CycleStatRow], filter: &DashboardFilter) -> DashboardData {
    let day_mode = filter.is_day_mode();

    let mut rated_cycles = 0i64;
    let mut rating_sum_tenths = 0i64;
    let mut total_minutes = 0i64;
    let mut total_sessions = 0i64;

    // label -> (sum of rating tenths, contributing rows)
    let mut trend: HashMap<String, (i64, i64)> = HashMap::new();
    let mut by_status: HashMap<String, i64> = HashMap::new();
    let mut histogram = [0i64; 11];

    for row in rows {
        total_minutes += row.total_minutes_finished.unwrap_or(0);
        total_sessions += row.sessions_count_finished.unwrap_or(0);

        let status = row
            .status_name
            .clone()
            .unwrap_or_else(|| NO_STATUS_LABEL.to_string());
        *by_status.entry(status).or_insert(0) += 1;

        let Some(rating) = row.rating_final else {
            continue;
        };
        rated_cycles += 1;
        rating_sum_tenths += to_tenths(rating);

        let bucket = (rating.floor() as i64).clamp(0, 10) as usize;
        histogram[bucket] += 1;

        if let Some(started) = DateTime::<Utc>::from_timestamp(row.started_at, 0) {
            let label = if day_mode {
                day_label(started.day(), started.month())
            } else {
                month_label(started.month0() as usize, started.year())
            };
            let entry = trend.entry(label).or_insert((0, 0));
            entry.0 += to_tenths(rating);
            entry.1 += 1;
        }
    }

    let avg_cycle_rating = if rated_cycles == 0 {
        None
    } else {
        Some(mean_tenths(rating_sum_tenths, rated_cycles))
    };

    let mut rating_trend: Vec<TrendPoint> = trend
        .into_iter()
        .map(|(label, (sum, count))| TrendPoint {
            value: mean_tenths(sum, count),
            count,
            label,
        })
        .collect();
    if day_mode {
        rating_trend.sort_by_key(|p| day_sort_key(&p.label));
    } else {
        rating_trend.sort_by_key(|p| month_sort_key(&p.label));
    }

    let mut status_breakdown: Vec<StatusSlice> = by_status
        .into_iter()
        .map(|(status, total)| StatusSlice { status, total })
        .collect();
    status_breakdown.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.status.cmp(&b.status)));

    let rating_histogram = histogram
        .iter()
        .enumerate()
        .map(|(bucket, &total)| HistogramBucket {
            bucket: bucket as u8,
            total,
        })
        .collect();

    DashboardData {
        kpis: DashboardKpis {
            cycles: rows.len() as i64,
            rated_cycles,
            avg_cycle_rating,
            total_minutes,
            total_sessions,
        },
        rating_trend,
        status_breakdown,
        rating_histogram,
    }
}

/// Trailing moving average over `window` points, one decimal per point.
/// The first `window - 1` points average whatever prefix exists.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            round1(slice.iter().sum::<f64>() / slice.len() as f64)
        })
        .collect()
}

fn day_label(day: u32, month: u32) -> String {
    format!("{day:02}/{month:02}")
}

fn month_label(month0: usize, year: i32) -> String {
    format!("{}/{:02}", PT_MONTHS[month0], year.rem_euclid(100))
}

/// "05/01" -> 5. Day buckets only exist under a single pinned month, so the
/// day of month alone orders them.
fn day_sort_key(label: &str) -> u32 {
    label
        .split('/')
        .next()
        .and_then(|d| d.parse().ok())
        .unwrap_or(0)
}

/// "Fev/24" -> 2024 * 12 + 1. Months order across year boundaries.
fn month_sort_key(label: &str) -> i64 {
    let mut parts = label.split('/');
    let month = parts
        .next()
        .and_then(|m| PT_MONTHS.iter().position(|p| *p == m))
        .unwrap_or(0) as i64;
    let year: i64 = parts.next().and_then(|y| y.parse().ok()).unwrap_or(0);
    (2000 + year) * 12 + month
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(year: i32, month: u32, day: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, 15, 0, 0)
            .unwrap()
            .timestamp()
    }

    fn rated(started_at: i64, rating: f64) -> CycleStatRow {
        CycleStatRow {
            started_at,
            rating_final: Some(rating),
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_yields_zeroed_dashboard() {
        let data = derive_dashboard(&[], &DashboardFilter::default());

        assert_eq!(data.kpis.cycles, 0);
        assert_eq!(data.kpis.rated_cycles, 0);
        assert_eq!(data.kpis.avg_cycle_rating, None);
        assert_eq!(data.kpis.total_minutes, 0);
        assert_eq!(data.kpis.total_sessions, 0);
        assert!(data.rating_trend.is_empty());
        assert!(data.status_breakdown.is_empty());
        assert_eq!(data.rating_histogram.len(), 11);
        assert!(data.rating_histogram.iter().all(|b| b.total == 0));
        let buckets: Vec<u8> = data.rating_histogram.iter().map(|b| b.bucket).collect();
        assert_eq!(buckets, (0..=10).collect::<Vec<u8>>());
    }

    #[test]
    fn midpoint_average_rounds_half_up() {
        let rows = vec![rated(at(2024, 1, 5), 10.0), rated(at(2024, 1, 20), 7.9)];
        let data = derive_dashboard(&rows, &DashboardFilter::default());

        assert_eq!(data.kpis.cycles, 2);
        assert_eq!(data.kpis.rated_cycles, 2);
        // (10.0 + 7.9) / 2 = 8.95 -> 9.0 under the half-up tenths rule.
        assert_eq!(data.kpis.avg_cycle_rating, Some(9.0));
    }

    #[test]
    fn unrated_rows_count_toward_totals_but_not_ratings() {
        let rows = vec![
            rated(at(2024, 3, 1), 8.0),
            CycleStatRow {
                started_at: at(2024, 3, 2),
                total_minutes_finished: Some(90),
                sessions_count_finished: Some(3),
                ..Default::default()
            },
        ];
        let data = derive_dashboard(&rows, &DashboardFilter::default());

        assert_eq!(data.kpis.cycles, 2);
        assert_eq!(data.kpis.rated_cycles, 1);
        assert_eq!(data.kpis.avg_cycle_rating, Some(8.0));
        assert_eq!(data.kpis.total_minutes, 90);
        assert_eq!(data.kpis.total_sessions, 3);
        assert_eq!(data.rating_trend.len(), 1);
        assert_eq!(data.rating_trend[0].count, 1);
    }

    #[test]
    fn absent_aggregates_are_zero_never_nan() {
        let rows = vec![rated(at(2024, 2, 1), 9.0)];
        let data = derive_dashboard(&rows, &DashboardFilter::default());

        assert_eq!(data.kpis.total_minutes, 0);
        assert_eq!(data.kpis.total_sessions, 0);
    }

    #[test]
    fn histogram_floors_and_keeps_edges() {
        let rows = vec![
            rated(at(2024, 1, 1), 10.0),
            rated(at(2024, 1, 2), 7.9),
            rated(at(2024, 1, 3), 0.0),
        ];
        let data = derive_dashboard(&rows, &DashboardFilter::default());

        assert_eq!(data.rating_histogram.len(), 11);
        assert_eq!(data.rating_histogram[10].total, 1);
        assert_eq!(data.rating_histogram[7].total, 1);
        assert_eq!(data.rating_histogram[0].total, 1);
        assert_eq!(data.rating_histogram[9].total, 0);
    }

    #[test]
    fn status_breakdown_counts_and_labels_missing() {
        let playing = CycleStatRow {
            started_at: at(2024, 1, 1),
            status_name: Some("Jogando".to_string()),
            ..Default::default()
        };
        let rows = vec![
            playing.clone(),
            playing,
            CycleStatRow {
                started_at: at(2024, 1, 2),
                ..Default::default()
            },
        ];
        let data = derive_dashboard(&rows, &DashboardFilter::default());

        assert_eq!(
            data.status_breakdown,
            vec![
                StatusSlice {
                    status: "Jogando".to_string(),
                    total: 2
                },
                StatusSlice {
                    status: NO_STATUS_LABEL.to_string(),
                    total: 1
                },
            ]
        );
    }

    #[test]
    fn status_ties_break_alphabetically() {
        let with = |name: &str| CycleStatRow {
            started_at: at(2024, 1, 1),
            status_name: Some(name.to_string()),
            ..Default::default()
        };
        let data = derive_dashboard(
            &[with("Pausado"), with("Backlog")],
            &DashboardFilter::default(),
        );

        assert_eq!(data.status_breakdown[0].status, "Backlog");
        assert_eq!(data.status_breakdown[1].status, "Pausado");
    }

    #[test]
    fn month_mode_labels_are_pt_br_and_ordered_across_years() {
        // Inserted newest-first on purpose; order must come from the labels.
        let rows = vec![
            rated(at(2024, 1, 10), 9.0),
            rated(at(2023, 12, 28), 7.0),
            rated(at(2024, 2, 3), 8.0),
        ];
        let data = derive_dashboard(&rows, &DashboardFilter::default());

        let labels: Vec<&str> = data.rating_trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Dez/23", "Jan/24", "Fev/24"]);
    }

    #[test]
    fn day_mode_requires_both_year_and_month() {
        let filter = DashboardFilter {
            year: None,
            month: Some(1),
        };
        assert!(!filter.is_day_mode());

        let rows = vec![rated(at(2024, 1, 5), 8.0)];
        let data = derive_dashboard(&rows, &filter);
        assert_eq!(data.rating_trend[0].label, "Jan/24");
    }

    #[test]
    fn day_mode_buckets_by_day_and_sorts_by_parsed_label() {
        let filter = DashboardFilter {
            year: Some(2024),
            month: Some(1),
        };
        let rows = vec![
            rated(at(2024, 1, 20), 7.0),
            rated(at(2024, 1, 5), 9.0),
            rated(at(2024, 1, 5), 8.0),
        ];
        let data = derive_dashboard(&rows, &filter);

        let labels: Vec<&str> = data.rating_trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["05/01", "20/01"]);
        assert_eq!(data.rating_trend[0].value, 8.5);
        assert_eq!(data.rating_trend[0].count, 2);
        assert_eq!(data.rating_trend[1].value, 7.0);
    }

    #[test]
    fn trend_bucket_mean_is_one_decimal() {
        let rows = vec![
            rated(at(2024, 5, 1), 8.0),
            rated(at(2024, 5, 2), 8.0),
            rated(at(2024, 5, 3), 9.0),
        ];
        let data = derive_dashboard(&rows, &DashboardFilter::default());

        // 25 / 3 = 8.333... -> 8.3
        assert_eq!(data.rating_trend[0].value, 8.3);
        assert_eq!(data.rating_trend[0].count, 3);
    }

    #[test]
    fn input_rows_are_not_consumed() {
        let rows = vec![rated(at(2024, 1, 1), 8.0)];
        let before = rows.clone();
        let _ = derive_dashboard(&rows, &DashboardFilter::default());
        assert_eq!(rows, before);
    }

    #[test]
    fn moving_average_trails_over_window() {
        assert_eq!(
            moving_average(&[8.0, 9.0, 10.0], 3),
            vec![8.0, 8.5, 9.0]
        );
        assert_eq!(moving_average(&[8.0, 9.0], 1), vec![8.0, 9.0]);
        assert_eq!(moving_average(&[], 3), Vec::<f64>::new());
        // A zero window behaves like 1 instead of dividing by zero.
        assert_eq!(moving_average(&[5.0], 0), vec![5.0]);
    }

    #[test]
    fn month_sort_key_parses_labels_back() {
        assert!(month_sort_key("Dez/23") < month_sort_key("Jan/24"));
        assert!(month_sort_key("Jan/24") < month_sort_key("Fev/24"));
        assert_eq!(day_sort_key("05/01"), 5);
        assert_eq!(day_sort_key("20/01"), 20);
    }
}
