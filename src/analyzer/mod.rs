pub mod availability;
pub mod heatmap;

pub use availability::{
    GroupMean, OverallTotals, RankedComponent, StageTotals, SummaryMetrics,
};
pub use heatmap::Heatmap;

use tracing::debug;

use crate::classify;
use crate::config::DashConfig;
use crate::filter::{self, FilterSelection};
use crate::ingest::LoadedTable;
use crate::model::ComponentRow;

/// One full recomputation of everything the display layer needs.
///
/// Stateless: built fresh from the raw table and the active filters on every
/// interaction, in the fixed order Section filter -> stage filter -> Category
/// filter -> drop headings -> normalize -> aggregate.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub rows: Vec<ComponentRow>,
    pub summary: SummaryMetrics,
    pub top_multiuse: Vec<RankedComponent>,
    pub top_short: Vec<RankedComponent>,
    pub top_available: Vec<RankedComponent>,
    pub stage_totals: Vec<StageTotals>,
    pub overall: OverallTotals,
    pub mean_by_section: Vec<GroupMean>,
    pub mean_by_category: Vec<GroupMean>,
    /// Indices into `rows`.
    pub critical: Vec<usize>,
    pub heatmap: Heatmap,
    pub stage_names: Vec<String>,
}

impl Snapshot {
    pub fn compute(table: &LoadedTable, selection: &FilterSelection, config: &DashConfig) -> Self {
        let cols = &table.columns;
        let categories = classify::assign_categories(&table.raw, cols);
        let keep = filter::filter_rows(&table.raw, cols, &categories, selection);
        let rows = classify::build_components(&table.raw, cols, &keep, &categories);

        let top_n = config.display.top_n;
        let stage_count = cols.stage_columns.len();
        let stage_totals = availability::stage_totals(&rows, &cols.stage_columns);
        let snapshot = Snapshot {
            summary: availability::summary(&rows, stage_count),
            top_multiuse: availability::top_multiuse(&rows, top_n),
            top_short: availability::top_short(&rows, top_n),
            top_available: availability::top_available(&rows, top_n),
            overall: availability::overall_totals(&stage_totals),
            stage_totals,
            mean_by_section: availability::mean_by_section(&rows),
            mean_by_category: availability::mean_by_category(&rows),
            critical: availability::critical_indices(&rows),
            heatmap: heatmap::build(&rows, cols.stage_names()),
            stage_names: cols.stage_names(),
            rows,
        };
        debug!(
            components = snapshot.rows.len(),
            critical = snapshot.critical.len(),
            "Snapshot recomputed"
        );
        snapshot
    }

    pub fn has_stage_columns(&self) -> bool {
        !self.stage_names.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn critical_rows(&self) -> impl Iterator<Item = &ComponentRow> {
        self.critical.iter().map(|&i| &self.rows[i])
    }
}
