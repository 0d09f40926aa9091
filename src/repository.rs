// repository.rs — Read/append interfaces the scoring code depends on.
//
// The calculators never touch storage. `Analytics` (analytics.rs) pulls a
// snapshot through these traits and hands plain slices to the pure functions,
// so tests can swap in any store.

use crate::error::Result;
use crate::models::{Build, BuildInput, Engine, ReliabilityReport, ReportInput};

pub trait ReportRepository {
    fn list_reports_for_engine(&self, engine_id: &str) -> Result<Vec<ReliabilityReport>>;
    fn list_all_reports(&self) -> Result<Vec<ReliabilityReport>>;
    /// Validate and store a new report, enforcing one report per user per
    /// engine per UTC day.
    fn append_report(&self, input: ReportInput) -> Result<ReliabilityReport>;
}

pub trait BuildRepository {
    fn list_builds(&self) -> Result<Vec<Build>>;
    fn append_build(&self, input: BuildInput) -> Result<Build>;
}

pub trait EngineRepository {
    /// Approved engines in catalog order, with `reliability_index` and
    /// `reports_count` filled in from the current report set.
    fn list_active_engines(&self) -> Result<Vec<Engine>>;
    fn get_engine(&self, engine_id: &str) -> Result<Option<Engine>>;
}
