//! Plain-text rendering of a snapshot for `--report` mode and piping.

use std::fmt::Write;

use crate::analyzer::{RankedComponent, Snapshot};
use crate::config::DashConfig;
use crate::filter::FilterSelection;

pub fn render(snapshot: &Snapshot, selection: &FilterSelection, config: &DashConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Component Test & Availability Report");
    let _ = writeln!(out, "====================================");
    if !selection.is_empty() {
        let mut active = Vec::new();
        if let Some(s) = &selection.section {
            active.push(format!("Section={}", s));
        }
        if let Some(i) = selection.stage_column {
            if let Some(name) = snapshot.stage_names.get(i) {
                active.push(format!("System={}", name));
            }
        }
        if let Some(c) = &selection.category {
            active.push(format!("Category={}", c));
        }
        let _ = writeln!(out, "Filters: {}", active.join(", "));
    }
    let _ = writeln!(out);

    if snapshot.is_empty() {
        let _ = writeln!(out, "No data (the filtered table is empty).");
        return out;
    }

    let summary = &snapshot.summary;
    let _ = writeln!(out, "Total components:    {}", summary.total_components);
    let _ = writeln!(
        out,
        "Avg used in systems: {}",
        summary
            .mean_available_in
            .map(|m| format!("{:.2}", m))
            .unwrap_or_else(|| "-".to_string())
    );
    let _ = writeln!(out, "Used in all systems: {}", summary.used_in_all);
    let _ = writeln!(out, "Used in none:        {}", summary.used_in_none);
    let _ = writeln!(out);

    if !snapshot.has_stage_columns() {
        let _ = writeln!(out, "No test-stage columns found; system-wise sections skipped.");
    } else {
        ranked_table(&mut out, "Top components by multi-system use", &snapshot.top_multiuse);
        ranked_table(&mut out, "Top shortage components (most 'S')", &snapshot.top_short);
        ranked_table(&mut out, "Top available components (most 'A')", &snapshot.top_available);

        let _ = writeln!(out, "System-wise availability vs shortage");
        let _ = writeln!(out, "------------------------------------");
        for totals in &snapshot.stage_totals {
            let _ = writeln!(
                out,
                "{:<24} A={:<5} S={}",
                totals.name, totals.available, totals.short
            );
        }
        match snapshot.overall.available_ratio() {
            Some(ratio) => {
                let _ = writeln!(
                    out,
                    "Overall: {} available / {} short ({:.1}% available)",
                    snapshot.overall.available,
                    snapshot.overall.short,
                    ratio * 100.0
                );
            }
            None => {
                let _ = writeln!(out, "Overall: no 'A' or 'S' marks in the filtered table.");
            }
        }
        let _ = writeln!(out);
    }

    grouped_means(&mut out, "Average 'Available Up To' per Section", &snapshot.mean_by_section);
    grouped_means(&mut out, "Average 'Available Up To' by Category", &snapshot.mean_by_category);

    if snapshot.critical.is_empty() {
        let _ = writeln!(out, "No critical components found.");
    } else {
        let _ = writeln!(out, "Critical components (zero stock or not used anywhere)");
        let _ = writeln!(out, "-----------------------------------------------------");
        for row in snapshot.critical_rows() {
            let _ = writeln!(
                out,
                "{:<32} stock={:<6} used in {}",
                row.nomenclature,
                row.stock.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                row.available_in
            );
        }
    }

    let _ = writeln!(
        out,
        "\nPreview cap: {} rows, ranked tables: top {}.",
        config.display.preview_rows, config.display.top_n
    );

    out
}

fn ranked_table(out: &mut String, title: &str, entries: &[RankedComponent]) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
    if entries.is_empty() {
        let _ = writeln!(out, "(no data)");
    }
    for entry in entries {
        let _ = writeln!(out, "{:<32} {}", entry.nomenclature, entry.value);
    }
    let _ = writeln!(out);
}

fn grouped_means(out: &mut String, title: &str, means: &[crate::analyzer::GroupMean]) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
    if means.is_empty() {
        let _ = writeln!(out, "(no data)");
    }
    for group in means {
        let _ = writeln!(
            out,
            "{:<24} {}",
            group.label,
            group
                .mean
                .map(|m| format!("{:.1}", m))
                .unwrap_or_else(|| "-".to_string())
        );
    }
    let _ = writeln!(out);
}
