// analytics.rs — Snapshot-then-compute front for the stats and index code.
//
// Each call reads a fresh snapshot through the repository traits and passes
// it to the pure functions in `reliability` and `stats`. Nothing is cached.

use crate::error::Result;
use crate::models::{EngineStats, ReportSummary};
use crate::reliability::reliability_index;
use crate::repository::{BuildRepository, EngineRepository, ReportRepository};
use crate::stats;

pub struct Analytics<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> Analytics<'a, S>
where
    S: ReportRepository + BuildRepository + EngineRepository + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn reliability_index_for(&self, engine_id: &str) -> Result<u8> {
        let reports = self.store.list_reports_for_engine(engine_id)?;
        Ok(reliability_index(&reports))
    }

    pub fn compute_all_stats(&self) -> Result<Vec<EngineStats>> {
        let engines = self.store.list_active_engines()?;
        let reports = self.store.list_all_reports()?;
        let builds = self.store.list_builds()?;
        tracing::debug!(
            engines = engines.len(),
            reports = reports.len(),
            builds = builds.len(),
            "computing engine stats"
        );
        Ok(stats::compute_all(&engines, &reports, &builds))
    }

    pub fn top_by_popularity(&self, limit: usize) -> Result<Vec<EngineStats>> {
        Ok(stats::top_by_popularity(self.compute_all_stats()?, limit))
    }

    pub fn top_by_reliability(&self, limit: usize) -> Result<Vec<EngineStats>> {
        Ok(stats::top_by_reliability(self.compute_all_stats()?, limit))
    }

    pub fn most_problematic(&self, limit: usize) -> Result<Vec<EngineStats>> {
        Ok(stats::most_problematic(self.compute_all_stats()?, limit))
    }

    pub fn report_summary(&self, engine_id: &str) -> Result<Option<ReportSummary>> {
        let reports = self.store.list_reports_for_engine(engine_id)?;
        Ok(stats::report_summary(&reports))
    }
}
