// stats.rs — Per-engine statistics and leaderboards.
//
// Everything here is a pure function over a snapshot (engines, reports,
// builds) that the caller has already read. Nothing is cached: each call
// recomputes from the full snapshot.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{
    BreakdownCategory, Build, CategoryCount, Engine, EngineStats, ReliabilityReport,
    ReportSummary, TopFailureReason,
};
use crate::reliability::{clamp_score, MileageSummary};

/// Failure rate (%) assumed for an engine with no reports.
pub const NO_DATA_FAILURE_RATE: f64 = 25.0;

/// Mileage to failure assumed when an engine has no failure reports.
pub const NO_DATA_MILEAGE_TO_FAILURE: f64 = 150.0;

/// Leaderboard size used when the caller doesn't give one.
pub const DEFAULT_LIMIT: usize = 10;

const REPORT_WEIGHT: u64 = 2;
const BUILD_WEIGHT: u64 = 5;

// ---------------------------------------------------------------------------
// Per-engine stats
// ---------------------------------------------------------------------------

/// One `EngineStats` per engine, in catalog order.
pub fn compute_all(
    engines: &[Engine],
    reports: &[ReliabilityReport],
    builds: &[Build],
) -> Vec<EngineStats> {
    // RUST NOTE: grouping once up front keeps this linear in the snapshot size
    // instead of re-filtering every report for every engine.
    let mut reports_by_engine: HashMap<&str, Vec<&ReliabilityReport>> = HashMap::new();
    for r in reports {
        reports_by_engine.entry(r.engine_id.as_str()).or_default().push(r);
    }
    let mut builds_by_engine: HashMap<&str, u32> = HashMap::new();
    for b in builds {
        *builds_by_engine.entry(b.engine_id.as_str()).or_insert(0) += 1;
    }

    engines
        .iter()
        .map(|engine| {
            let engine_reports = reports_by_engine
                .get(engine.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let build_count = builds_by_engine.get(engine.id.as_str()).copied().unwrap_or(0);
            engine_stats(engine, engine_reports, build_count)
        })
        .collect()
}

/// Stats for one engine given its own reports and build count.
pub fn engine_stats(engine: &Engine, reports: &[&ReliabilityReport], build_count: u32) -> EngineStats {
    let failures: Vec<&ReliabilityReport> =
        reports.iter().copied().filter(|r| r.has_breakdowns).collect();

    let failure_rate = if reports.is_empty() {
        NO_DATA_FAILURE_RATE
    } else {
        failures.len() as f64 / reports.len() as f64 * 100.0
    };

    let avg_mileage_to_failure = MileageSummary::from_reports(failures.iter().copied())
        .mixed_average()
        .unwrap_or(NO_DATA_MILEAGE_TO_FAILURE);

    let reliability_score = clamp_score(100.0 - failure_rate + avg_mileage_to_failure / 10.0);

    let owners = reports.len() as u64;
    let popularity_score = owners
        .saturating_mul(REPORT_WEIGHT)
        .saturating_add(u64::from(build_count).saturating_mul(BUILD_WEIGHT))
        .saturating_add(engine.views.unwrap_or(0));

    EngineStats {
        engine_id:              engine.id.clone(),
        engine_name:            engine.name.clone(),
        brand:                  engine.brand.clone(),
        owners_count:           reports.len() as u32,
        builds_count:           build_count,
        avg_mileage_to_failure: round_non_negative(avg_mileage_to_failure),
        failure_rate:           round_non_negative(failure_rate) as u32,
        top_failure_reason:     top_failure_reason(&failures),
        reliability_score,
        popularity_score,
    }
}

/// Most frequent category across failure reports. Each category on each
/// report counts once; on a tie the category seen first wins.
pub fn top_failure_reason(failures: &[&ReliabilityReport]) -> TopFailureReason {
    // Insertion order is the tie-break, so a Vec rather than a map.
    let mut tally: Vec<(BreakdownCategory, u32)> = Vec::new();
    for r in failures {
        for cat in &r.breakdown_categories {
            match tally.iter_mut().find(|(c, _)| c == cat) {
                Some((_, n)) => *n += 1,
                None         => tally.push((*cat, 1)),
            }
        }
    }

    let mut best: Option<(BreakdownCategory, u32)> = None;
    for (cat, n) in tally {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((cat, n));
        }
    }

    best.map_or(TopFailureReason::NoData, |(cat, _)| TopFailureReason::Category(cat))
}

fn round_non_negative(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    // `as` saturates at u64::MAX for huge values
    value.round() as u64
}

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// Highest popularity first.
pub fn top_by_popularity(stats: Vec<EngineStats>, limit: usize) -> Vec<EngineStats> {
    rank(stats, limit, |s| s.popularity_score)
}

/// Highest reliability score first.
pub fn top_by_reliability(stats: Vec<EngineStats>, limit: usize) -> Vec<EngineStats> {
    rank(stats, limit, |s| u64::from(s.reliability_score))
}

/// Highest failure rate first, ignoring engines nobody has reported on.
pub fn most_problematic(stats: Vec<EngineStats>, limit: usize) -> Vec<EngineStats> {
    let reported = stats.into_iter().filter(|s| s.owners_count > 0).collect();
    rank(reported, limit, |s| u64::from(s.failure_rate))
}

/// Sort descending by `key`, ties by engine id ascending, and keep `limit`.
fn rank<F>(mut stats: Vec<EngineStats>, limit: usize, key: F) -> Vec<EngineStats>
where
    F: Fn(&EngineStats) -> u64,
{
    stats.sort_by(|a, b| match key(b).cmp(&key(a)) {
        Ordering::Equal => a.engine_id.cmp(&b.engine_id),
        other           => other,
    });
    stats.truncate(limit);
    stats
}

// ---------------------------------------------------------------------------
// Detail-page summary
// ---------------------------------------------------------------------------

/// Summary of one engine's reports, or `None` when there are none.
///
/// The distribution covers every category, zero-filled, and counts
/// categories on all reports (not just those flagged with breakdowns).
pub fn report_summary(reports: &[ReliabilityReport]) -> Option<ReportSummary> {
    if reports.is_empty() {
        return None;
    }

    let mut breakdown_dist: Vec<CategoryCount> = BreakdownCategory::ALL
        .iter()
        .map(|c| CategoryCount { category: *c, count: 0 })
        .collect();
    for r in reports {
        for cat in &r.breakdown_categories {
            if let Some(entry) = breakdown_dist.iter_mut().find(|e| e.category == *cat) {
                entry.count += 1;
            }
        }
    }

    Some(ReportSummary {
        total:          reports.len() as u32,
        no_breakdowns:  reports.iter().filter(|r| !r.has_breakdowns).count() as u32,
        avg_mileage:    MileageSummary::from_reports(reports).mixed_average().unwrap_or(0.0),
        breakdown_dist,
    })
}
