use serde::{Deserialize, Serialize};

/// Untyped table as read from the uploaded file, headers already normalized.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell accessor that treats short rows as padded with empty cells.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Status code of one component in one test-stage column.
///
/// "A" and "S" are the only codes with aggregate meaning; everything else
/// (the "I"/"F" markers, typos) is preserved verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Available,
    Short,
    Blank,
    Other(String),
}

impl Status {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "A" => Status::Available,
            "S" => Status::Short,
            "" => Status::Blank,
            other => Status::Other(other.to_string()),
        }
    }

    /// Original cell text, for export and heatmap labels.
    pub fn code(&self) -> &str {
        match self {
            Status::Available => "A",
            Status::Short => "S",
            Status::Blank => "",
            Status::Other(code) => code,
        }
    }
}

/// One detected test-stage column (name contains the stage marker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageColumn {
    /// Column index in the raw table.
    pub index: usize,
    pub name: String,
}

/// Resolved positions of the required columns plus the test-stage columns.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub section: usize,
    pub nomenclature: usize,
    pub bom_qty: usize,
    pub stock: usize,
    pub available_up_to: usize,
    pub stage_columns: Vec<StageColumn>,
}

impl ColumnMap {
    pub fn stage_names(&self) -> Vec<String> {
        self.stage_columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// One cleaned data row. Heading rows never make it into this type.
///
/// `id` is the row's index in the raw table. Nomenclature is not unique in
/// real exports, so index-keyed views (the heatmap) key on `id` and use
/// `nomenclature` purely as a display label.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentRow {
    pub id: usize,
    pub section: String,
    pub category: Option<String>,
    pub nomenclature: String,
    pub bom_qty: f64,
    pub stock: Option<i64>,
    pub available_up_to: Option<u32>,
    pub statuses: Vec<Status>,
    /// Count of stage columns where this component is "A".
    pub available_in: usize,
    /// Count of stage columns where this component is "S".
    pub short_count: usize,
}

impl ComponentRow {
    pub fn is_critical(&self) -> bool {
        self.stock == Some(0) || self.available_in == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(Status::from_code("A"), Status::Available);
        assert_eq!(Status::from_code(" S "), Status::Short);
        assert_eq!(Status::from_code(""), Status::Blank);
        assert_eq!(Status::from_code("F"), Status::Other("F".to_string()));
        assert_eq!(Status::from_code("I").code(), "I");
    }

    #[test]
    fn test_raw_table_pads_short_rows() {
        let table = RawTable {
            headers: vec!["A".into(), "B".into()],
            rows: vec![vec!["x".into()]],
        };
        assert_eq!(table.cell(0, 0), "x");
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.cell(5, 0), "");
    }

    #[test]
    fn test_critical_requires_zero_stock_or_unused() {
        let mut row = ComponentRow {
            id: 0,
            section: "S1".into(),
            category: None,
            nomenclature: "BOLT".into(),
            bom_qty: 1.0,
            stock: Some(5),
            available_up_to: None,
            statuses: vec![],
            available_in: 2,
            short_count: 0,
        };
        assert!(!row.is_critical());
        row.stock = Some(0);
        assert!(row.is_critical());
        row.stock = None;
        assert!(!row.is_critical());
        row.available_in = 0;
        assert!(row.is_critical());
    }
}
