//! Component × test-stage heatmap encoding.
//!
//! "A" -> 1.0, "S" -> 0.0, blank -> missing. Other codes ("I", "F", typos)
//! carry no intensity either; the renderer shows them as neutral with the
//! original code preserved as the cell label. Rows are keyed by the
//! component's synthetic id because Nomenclature is not unique in real
//! exports; the name is only a display label.

use crate::model::{ComponentRow, Status};

#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    /// Original status code, shown in the cell.
    pub code: String,
    /// None for blank and unmapped codes.
    pub intensity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRow {
    pub id: usize,
    pub label: String,
    pub cells: Vec<HeatCell>,
}

#[derive(Debug, Clone, Default)]
pub struct Heatmap {
    pub stage_names: Vec<String>,
    pub rows: Vec<HeatmapRow>,
}

pub fn intensity(status: &Status) -> Option<f64> {
    match status {
        Status::Available => Some(1.0),
        Status::Short => Some(0.0),
        Status::Blank | Status::Other(_) => None,
    }
}

pub fn build(rows: &[ComponentRow], stage_names: Vec<String>) -> Heatmap {
    let rows = rows
        .iter()
        .map(|row| HeatmapRow {
            id: row.id,
            label: row.nomenclature.clone(),
            cells: row
                .statuses
                .iter()
                .map(|status| HeatCell {
                    code: status.code().to_string(),
                    intensity: intensity(status),
                })
                .collect(),
        })
        .collect();

    Heatmap { stage_names, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_mapping() {
        assert_eq!(intensity(&Status::Available), Some(1.0));
        assert_eq!(intensity(&Status::Short), Some(0.0));
        assert_eq!(intensity(&Status::Blank), None);
        assert_eq!(intensity(&Status::Other("F".to_string())), None);
    }

    #[test]
    fn test_duplicate_nomenclature_rows_stay_distinct() {
        let make = |id: usize| ComponentRow {
            id,
            section: "S1".to_string(),
            category: None,
            nomenclature: "GASKET".to_string(),
            bom_qty: 1.0,
            stock: Some(1),
            available_up_to: None,
            statuses: vec![Status::Available, Status::Short],
            available_in: 1,
            short_count: 1,
        };
        let heatmap = build(&[make(3), make(7)], vec!["T1".into(), "T2".into()]);
        assert_eq!(heatmap.rows.len(), 2);
        assert_ne!(heatmap.rows[0].id, heatmap.rows[1].id);
        assert_eq!(heatmap.rows[0].label, heatmap.rows[1].label);
        assert_eq!(heatmap.rows[0].cells[0].intensity, Some(1.0));
        assert_eq!(heatmap.rows[0].cells[1].code, "S");
    }
}
