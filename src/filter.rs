//! Filter selection and the fixed application order:
//! Section -> test-stage column -> Category -> drop headings -> normalize.

use crate::model::{ColumnMap, RawTable, Status};

/// Active filter widgets. `stage_column` indexes into `ColumnMap::stage_columns`
/// and restricts to rows with status "A" in that column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub section: Option<String>,
    pub stage_column: Option<usize>,
    pub category: Option<String>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.section.is_none() && self.stage_column.is_none() && self.category.is_none()
    }

    pub fn clear(&mut self) {
        *self = FilterSelection::default();
    }
}

/// Raw-row indices surviving the Section, stage and Category filters, in
/// original order. Heading rows are still present afterwards; dropping them
/// is the classifier's job and happens after this pass.
pub fn filter_rows(
    raw: &RawTable,
    cols: &ColumnMap,
    categories: &[Option<String>],
    selection: &FilterSelection,
) -> Vec<usize> {
    let stage_index = selection
        .stage_column
        .and_then(|i| cols.stage_columns.get(i))
        .map(|c| c.index);

    (0..raw.height())
        .filter(|&i| {
            if let Some(section) = &selection.section {
                if raw.cell(i, cols.section).trim() != section {
                    return false;
                }
            }
            if let Some(col) = stage_index {
                if Status::from_code(raw.cell(i, col)) != Status::Available {
                    return false;
                }
            }
            if let Some(category) = &selection.category {
                if categories.get(i).cloned().flatten().as_deref() != Some(category.as_str()) {
                    return false;
                }
            }
            true
        })
        .collect()
}

/// Distinct section labels in the raw table, sorted, for the filter widget.
pub fn section_values(raw: &RawTable, cols: &ColumnMap) -> Vec<String> {
    let mut values: Vec<String> = (0..raw.height())
        .map(|i| raw.cell(i, cols.section).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    values.sort();
    values.dedup();
    values
}

/// Distinct assigned categories, sorted, for the filter widget.
pub fn category_values(categories: &[Option<String>]) -> Vec<String> {
    let mut values: Vec<String> = categories.iter().flatten().cloned().collect();
    values.sort();
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify;
    use crate::model::StageColumn;

    fn fixture() -> (RawTable, ColumnMap) {
        let headers = vec![
            "Section".to_string(),
            "Nomenclature".to_string(),
            "Bom Qty".to_string(),
            "Stock".to_string(),
            "Available Up To".to_string(),
            "T1(A/I/F)".to_string(),
        ];
        let rows = vec![
            vec!["S1", "Engine", "-", "", "", ""],
            vec!["S1", "Piston", "2", "4", "AP 10", "A"],
            vec!["S2", "Ring", "6", "0", "AP 5", "S"],
            vec!["S2", "Gearbox", "--", "", "", ""],
            vec!["S2", "Clutch", "1", "2", "AP 7", "A"],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect())
        .collect();
        let raw = RawTable { headers, rows };
        let cols = ColumnMap {
            section: 0,
            nomenclature: 1,
            bom_qty: 2,
            stock: 3,
            available_up_to: 4,
            stage_columns: vec![StageColumn {
                index: 5,
                name: "T1(A/I/F)".to_string(),
            }],
        };
        (raw, cols)
    }

    #[test]
    fn test_empty_selection_keeps_everything() {
        let (raw, cols) = fixture();
        let categories = classify::assign_categories(&raw, &cols);
        let keep = filter_rows(&raw, &cols, &categories, &FilterSelection::default());
        assert_eq!(keep, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_section_filter() {
        let (raw, cols) = fixture();
        let categories = classify::assign_categories(&raw, &cols);
        let selection = FilterSelection {
            section: Some("S2".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_rows(&raw, &cols, &categories, &selection), vec![2, 3, 4]);
    }

    #[test]
    fn test_stage_filter_keeps_only_available() {
        let (raw, cols) = fixture();
        let categories = classify::assign_categories(&raw, &cols);
        let selection = FilterSelection {
            stage_column: Some(0),
            ..Default::default()
        };
        assert_eq!(filter_rows(&raw, &cols, &categories, &selection), vec![1, 4]);
    }

    #[test]
    fn test_category_filter_uses_assigned_categories() {
        let (raw, cols) = fixture();
        let categories = classify::assign_categories(&raw, &cols);
        let selection = FilterSelection {
            category: Some("GEARBOX".to_string()),
            ..Default::default()
        };
        // The heading row itself has no category and is excluded
        assert_eq!(filter_rows(&raw, &cols, &categories, &selection), vec![4]);
    }

    #[test]
    fn test_filter_value_lists() {
        let (raw, cols) = fixture();
        let categories = classify::assign_categories(&raw, &cols);
        assert_eq!(section_values(&raw, &cols), vec!["S1", "S2"]);
        assert_eq!(category_values(&categories), vec!["ENGINE", "GEARBOX"]);
    }
}
