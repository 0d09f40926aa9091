// reliability.rs — Reliability index for a single engine.
//
// The index is what the engine list shows next to each engine. It is NOT the
// same number as `EngineStats::reliability_score` (see stats.rs); the two use
// different formulas and different no-data defaults.

use crate::models::{MileageUnit, ReliabilityReport};

/// Index returned when an engine has no reports at all.
pub const NO_DATA_INDEX: u8 = 75;

/// Points lost when every report has a breakdown.
const MAX_BREAKDOWN_PENALTY: f64 = 50.0;

/// Cap on the mileage bonus.
const MAX_MILEAGE_BONUS: f64 = 20.0;

/// Per-unit mileage totals for a set of reports.
///
/// Reports are tagged in hours or kilometers and nothing converts between the
/// two. `mixed_average` adds them together anyway; that is the value the
/// index uses, so callers that care can check `has_mixed_units` first.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MileageSummary {
    pub hours_total:      f64,
    pub hours_count:      u32,
    pub kilometers_total: f64,
    pub kilometers_count: u32,
}

impl MileageSummary {
    pub fn from_reports<'a, I>(reports: I) -> Self
    where
        I: IntoIterator<Item = &'a ReliabilityReport>,
    {
        let mut summary = MileageSummary::default();
        for r in reports {
            match r.mileage_unit {
                MileageUnit::Hours => {
                    summary.hours_total += r.mileage;
                    summary.hours_count += 1;
                }
                MileageUnit::Kilometers => {
                    summary.kilometers_total += r.mileage;
                    summary.kilometers_count += 1;
                }
            }
        }
        summary
    }

    pub fn count(&self) -> u32 {
        self.hours_count + self.kilometers_count
    }

    pub fn has_mixed_units(&self) -> bool {
        self.hours_count > 0 && self.kilometers_count > 0
    }

    /// Mean of every mileage value, hours and kilometers summed as-is.
    /// `None` when there are no reports.
    pub fn mixed_average(&self) -> Option<f64> {
        match self.count() {
            0 => None,
            n => Some((self.hours_total + self.kilometers_total) / f64::from(n)),
        }
    }

    pub fn hours_average(&self) -> Option<f64> {
        (self.hours_count > 0).then(|| self.hours_total / f64::from(self.hours_count))
    }

    pub fn kilometers_average(&self) -> Option<f64> {
        (self.kilometers_count > 0).then(|| self.kilometers_total / f64::from(self.kilometers_count))
    }
}

/// Reliability index in `0..=100` for one engine's reports.
///
/// The caller filters reports by engine. With no reports the result is
/// `NO_DATA_INDEX`. Otherwise:
///
/// ```text
/// base  = 100 - breakdown_rate * 50
/// bonus = min(mixed_average_mileage / 10, 20)
/// index = clamp(round(base + bonus), 0, 100)
/// ```
pub fn reliability_index(reports: &[ReliabilityReport]) -> u8 {
    if reports.is_empty() {
        return NO_DATA_INDEX;
    }

    let total = reports.len() as f64;
    let broken = reports.iter().filter(|r| r.has_breakdowns).count() as f64;
    let breakdown_rate = broken / total;

    let base = 100.0 - breakdown_rate * MAX_BREAKDOWN_PENALTY;

    let avg_mileage = MileageSummary::from_reports(reports)
        .mixed_average()
        .unwrap_or(0.0);
    let bonus = (avg_mileage / 10.0).min(MAX_MILEAGE_BONUS);

    clamp_score(base + bonus)
}

/// Round and clamp into `0..=100`. NaN maps to 0.
pub(crate) fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}
