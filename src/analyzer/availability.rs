//! Availability statistics over the cleaned component table.
//!
//! Everything here is a pure function of the filtered rows (plus the stage
//! column list); one filter change upstream means one full recomputation.
//! Empty inputs and zero stage columns produce empty results, never panics.

use std::collections::BTreeMap;

use crate::model::{ComponentRow, StageColumn, Status};

/// The four headline metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub total_components: usize,
    /// None when the table is empty.
    pub mean_available_in: Option<f64>,
    /// Rows available in every stage column (0 stage columns -> 0, not all).
    pub used_in_all: usize,
    pub used_in_none: usize,
}

/// One entry of a ranked table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedComponent {
    pub id: usize,
    pub nomenclature: String,
    pub value: usize,
}

/// Per-stage "A"/"S" totals across all rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTotals {
    pub name: String,
    pub available: usize,
    pub short: usize,
}

/// Grand totals across every cell of every stage column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverallTotals {
    pub available: usize,
    pub short: usize,
}

impl OverallTotals {
    /// Share of "A" among counted cells; None when nothing was counted.
    pub fn available_ratio(&self) -> Option<f64> {
        let total = self.available + self.short;
        if total == 0 {
            None
        } else {
            Some(self.available as f64 / total as f64)
        }
    }
}

/// Mean Available-Up-To for one group label.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub label: String,
    /// None when no row in the group had a parseable Available Up To.
    pub mean: Option<f64>,
}

pub fn summary(rows: &[ComponentRow], stage_count: usize) -> SummaryMetrics {
    let total = rows.len();
    let mean = if total == 0 {
        None
    } else {
        let sum: usize = rows.iter().map(|r| r.available_in).sum();
        Some(sum as f64 / total as f64)
    };
    let used_in_all = if stage_count == 0 {
        0
    } else {
        rows.iter().filter(|r| r.available_in == stage_count).count()
    };
    let used_in_none = rows.iter().filter(|r| r.available_in == 0).count();

    SummaryMetrics {
        total_components: total,
        mean_available_in: mean,
        used_in_all,
        used_in_none,
    }
}

fn top_by<F>(rows: &[ComponentRow], n: usize, value: F) -> Vec<RankedComponent>
where
    F: Fn(&ComponentRow) -> usize,
{
    let mut ranked: Vec<RankedComponent> = rows
        .iter()
        .map(|r| RankedComponent {
            id: r.id,
            nomenclature: r.nomenclature.clone(),
            value: value(r),
        })
        .collect();
    // sort_by is stable: ties keep original row order
    ranked.sort_by(|a, b| b.value.cmp(&a.value));
    ranked.truncate(n);
    ranked
}

/// Top-N components by number of stages they are available in.
pub fn top_multiuse(rows: &[ComponentRow], n: usize) -> Vec<RankedComponent> {
    top_by(rows, n, |r| r.available_in)
}

/// Top-N shortage components (most "S" marks).
pub fn top_short(rows: &[ComponentRow], n: usize) -> Vec<RankedComponent> {
    top_by(rows, n, |r| r.short_count)
}

/// Top-N available components (most "A" marks).
pub fn top_available(rows: &[ComponentRow], n: usize) -> Vec<RankedComponent> {
    top_by(rows, n, |r| r.available_in)
}

pub fn stage_totals(rows: &[ComponentRow], stage_columns: &[StageColumn]) -> Vec<StageTotals> {
    stage_columns
        .iter()
        .enumerate()
        .map(|(stage, col)| {
            let mut totals = StageTotals {
                name: col.name.clone(),
                available: 0,
                short: 0,
            };
            for row in rows {
                match row.statuses.get(stage) {
                    Some(Status::Available) => totals.available += 1,
                    Some(Status::Short) => totals.short += 1,
                    _ => {}
                }
            }
            totals
        })
        .collect()
}

pub fn overall_totals(per_stage: &[StageTotals]) -> OverallTotals {
    per_stage.iter().fold(OverallTotals::default(), |acc, t| {
        OverallTotals {
            available: acc.available + t.available,
            short: acc.short + t.short,
        }
    })
}

/// Mean Available-Up-To per Section label, sorted by label.
pub fn mean_by_section(rows: &[ComponentRow]) -> Vec<GroupMean> {
    group_means(rows.iter().map(|r| (r.section.clone(), r.available_up_to)))
}

/// Mean Available-Up-To per Category, sorted ascending by mean (groups with
/// no parseable values last). Uncategorized rows are not a group.
pub fn mean_by_category(rows: &[ComponentRow]) -> Vec<GroupMean> {
    let mut means = group_means(
        rows.iter()
            .filter_map(|r| r.category.clone().map(|c| (c, r.available_up_to))),
    );
    means.sort_by(|a, b| match (a.mean, b.mean) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    means
}

fn group_means(pairs: impl Iterator<Item = (String, Option<u32>)>) -> Vec<GroupMean> {
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (label, value) in pairs {
        let entry = groups.entry(label).or_insert((0.0, 0));
        if let Some(v) = value {
            entry.0 += v as f64;
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(label, (sum, count))| GroupMean {
            label,
            mean: if count == 0 { None } else { Some(sum / count as f64) },
        })
        .collect()
}

/// Indices (into `rows`) of components with zero stock or unused everywhere.
pub fn critical_indices(rows: &[ComponentRow]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, r)| r.is_critical())
        .map(|(i, _)| i)
        .collect()
}
