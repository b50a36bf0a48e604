//! Row classification and field normalization.
//!
//! BOM exports interleave data rows with category heading rows; a heading is
//! any row whose Bom Qty does not read as a number. Heading detection and the
//! later heading drop share one numeric predicate so the two passes can never
//! disagree on adversarial input.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{ColumnMap, ComponentRow, RawTable, Status};

/// Shared numeric predicate for Bom Qty.
///
/// Strips whitespace and dashes first, so placeholder cells like "- -" or
/// "  " reduce to the empty string and count as non-numeric. Only plain
/// digit runs qualify; "2.5" or "1e3" are headings, same as the original
/// export tooling treats them.
pub fn is_numeric_qty(text: &str) -> bool {
    let stripped: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

/// Parse a Bom Qty cell that already passed [`is_numeric_qty`].
pub fn parse_bom_qty(text: &str) -> Option<f64> {
    if !is_numeric_qty(text) {
        return None;
    }
    let digits: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    digits.parse::<f64>().ok()
}

/// First contiguous digit run in the text, e.g. "AP 25" -> 25, "AP100" -> 100.
/// Text without digits ("N/A", "") yields None and stays missing downstream.
pub fn extract_stage_number(text: &str) -> Option<u32> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let re = DIGITS.get_or_init(|| Regex::new(r"\d+").unwrap());
    re.find(text).and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Lenient integer parse for Stock; dirty cells become missing, not errors.
pub fn parse_stock(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Assign a category to every row in original order.
///
/// Single left-to-right pass with an explicit accumulator: a heading row
/// replaces the current category (uppercased, trimmed Nomenclature) and
/// itself gets None; a data row gets the current category. Rows before the
/// first heading keep None permanently.
pub fn assign_categories(raw: &RawTable, cols: &ColumnMap) -> Vec<Option<String>> {
    let mut current: Option<String> = None;
    let mut categories = Vec::with_capacity(raw.height());

    for i in 0..raw.height() {
        let bom_qty = raw.cell(i, cols.bom_qty);
        if is_numeric_qty(bom_qty) {
            categories.push(current.clone());
        } else {
            let label = raw.cell(i, cols.nomenclature).trim().to_uppercase();
            current = Some(label);
            categories.push(None);
        }
    }

    categories
}

/// Build cleaned component rows from the raw rows whose indices survived
/// filtering. Heading rows are dropped here (the authoritative numeric check,
/// same predicate as heading detection) and numeric fields are normalized.
pub fn build_components(
    raw: &RawTable,
    cols: &ColumnMap,
    keep: &[usize],
    categories: &[Option<String>],
) -> Vec<ComponentRow> {
    let mut components = Vec::new();

    for &i in keep {
        let bom_qty = match parse_bom_qty(raw.cell(i, cols.bom_qty)) {
            Some(qty) => qty,
            None => continue, // heading row
        };

        let statuses: Vec<Status> = cols
            .stage_columns
            .iter()
            .map(|stage| Status::from_code(raw.cell(i, stage.index)))
            .collect();
        let available_in = statuses.iter().filter(|s| **s == Status::Available).count();
        let short_count = statuses.iter().filter(|s| **s == Status::Short).count();

        components.push(ComponentRow {
            id: i,
            section: raw.cell(i, cols.section).trim().to_string(),
            category: categories.get(i).cloned().flatten(),
            nomenclature: raw.cell(i, cols.nomenclature).trim().to_string(),
            bom_qty,
            stock: parse_stock(raw.cell(i, cols.stock)),
            available_up_to: extract_stage_number(raw.cell(i, cols.available_up_to)),
            statuses,
            available_in,
            short_count,
        });
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_columns() -> ColumnMap {
        ColumnMap {
            section: 0,
            nomenclature: 1,
            bom_qty: 2,
            stock: 3,
            available_up_to: 4,
            stage_columns: vec![],
        }
    }

    fn row(section: &str, name: &str, qty: &str) -> Vec<String> {
        vec![
            section.to_string(),
            name.to_string(),
            qty.to_string(),
            "0".to_string(),
            String::new(),
        ]
    }

    #[test]
    fn test_numeric_predicate() {
        assert!(is_numeric_qty("2"));
        assert!(is_numeric_qty(" 10 "));
        assert!(is_numeric_qty("1 000"));
        assert!(!is_numeric_qty(""));
        assert!(!is_numeric_qty("- -"));
        assert!(!is_numeric_qty("--"));
        assert!(!is_numeric_qty("  "));
        assert!(!is_numeric_qty("2.5"));
        assert!(!is_numeric_qty("1e3"));
        assert!(!is_numeric_qty("qty"));
    }

    #[test]
    fn test_stage_number_extraction() {
        assert_eq!(extract_stage_number("AP 25"), Some(25));
        assert_eq!(extract_stage_number("AP100"), Some(100));
        assert_eq!(extract_stage_number("N/A"), None);
        assert_eq!(extract_stage_number(""), None);
    }

    #[test]
    fn test_categories_follow_nearest_heading() {
        let raw = RawTable {
            headers: vec![],
            rows: vec![
                row("S1", "Engine", "-"),
                row("S1", "Piston", "2"),
                row("S1", "Crankshaft", "1"),
                row("S1", "Gearbox", "--"),
                row("S1", "Clutch Plate", "4"),
            ],
        };
        let categories = assign_categories(&raw, &test_columns());
        assert_eq!(
            categories,
            vec![
                None,
                Some("ENGINE".to_string()),
                Some("ENGINE".to_string()),
                None,
                Some("GEARBOX".to_string()),
            ]
        );
    }

    #[test]
    fn test_rows_before_first_heading_stay_uncategorized() {
        let raw = RawTable {
            headers: vec![],
            rows: vec![row("S1", "Orphan", "3"), row("S1", "Engine", "-")],
        };
        let categories = assign_categories(&raw, &test_columns());
        assert_eq!(categories, vec![None, None]);
    }

    #[test]
    fn test_dash_only_qty_is_heading_not_data() {
        let raw = RawTable {
            headers: vec![],
            rows: vec![row("S1", "Engine", "- -"), row("S1", "Piston", "2")],
        };
        let cols = test_columns();
        let categories = assign_categories(&raw, &cols);
        let keep: Vec<usize> = (0..raw.height()).collect();
        let components = build_components(&raw, &cols, &keep, &categories);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].nomenclature, "Piston");
        assert_eq!(components[0].category.as_deref(), Some("ENGINE"));
    }

    #[test]
    fn test_heading_drop_is_idempotent() {
        let raw = RawTable {
            headers: vec![],
            rows: vec![
                row("S1", "Engine", "-"),
                row("S1", "Piston", "2"),
                row("S1", "Bolt", "8"),
            ],
        };
        let cols = test_columns();
        let categories = assign_categories(&raw, &cols);
        let keep: Vec<usize> = (0..raw.height()).collect();
        let once = build_components(&raw, &cols, &keep, &categories);
        let surviving: Vec<usize> = once.iter().map(|c| c.id).collect();
        let twice = build_components(&raw, &cols, &surviving, &categories);
        assert_eq!(once.len(), twice.len());
        assert_eq!(surviving, twice.iter().map(|c| c.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_available_in_counts_only_a() {
        let raw = RawTable {
            headers: vec![],
            rows: vec![vec![
                "S1".to_string(),
                "Pump".to_string(),
                "1".to_string(),
                "5".to_string(),
                "AP 25".to_string(),
                "A".to_string(),
                "S".to_string(),
                "A".to_string(),
                "I".to_string(),
            ]],
        };
        let mut cols = test_columns();
        cols.stage_columns = (5..9)
            .map(|index| crate::model::StageColumn {
                index,
                name: format!("T{} (A/I/F)", index - 4),
            })
            .collect();
        let categories = vec![Some("ENGINE".to_string())];
        let components = build_components(&raw, &cols, &[0], &categories);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].available_in, 2);
        assert_eq!(components[0].short_count, 1);
        assert_eq!(components[0].available_up_to, Some(25));
        assert_eq!(components[0].stock, Some(5));
    }
}
