//! File ingestion: CSV via polars, spreadsheets via calamine.
//!
//! Every cell comes in as text. Schema inference stays off on purpose: the
//! numeric-vs-heading call on Bom Qty belongs to the classifier, not to the
//! reader's type guesser.

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::path::Path;
use tracing::{info, warn};

use crate::config::DashConfig;
use crate::error::{DashError, DashResult};
use crate::model::{ColumnMap, RawTable, StageColumn};

/// Required columns, by normalized header name.
pub const REQUIRED_COLUMNS: [&str; 5] =
    ["Section", "Nomenclature", "Bom Qty", "Stock", "Available Up To"];

/// A raw table together with its resolved column map.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub raw: RawTable,
    pub columns: ColumnMap,
}

/// Load a BOM export and validate its header row.
pub fn load_table(path: &Path, config: &DashConfig) -> DashResult<LoadedTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut raw = match extension.as_str() {
        "csv" | "txt" | "tsv" => read_delimited(path)?,
        "xlsx" | "xlsm" | "xls" | "ods" => read_spreadsheet(path)?,
        other => return Err(DashError::unsupported_format(other)),
    };

    raw.headers = raw.headers.iter().map(|h| normalize_header(h)).collect();

    let columns = resolve_columns(&raw.headers, &config.columns.stage_marker)?;
    info!(
        rows = raw.height(),
        stage_columns = columns.stage_columns.len(),
        "Loaded {}",
        path.display()
    );
    if columns.stage_columns.is_empty() {
        warn!(
            "No test-stage columns found (no header contains '{}')",
            config.columns.stage_marker
        );
    }

    Ok(LoadedTable { raw, columns })
}

fn read_delimited(path: &Path) -> DashResult<RawTable> {
    let df = CsvReader::from_path(path)?
        .has_header(true)
        .infer_schema(Some(0)) // everything stays Utf8
        .finish()?;

    let headers: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    let columns = df.get_columns();

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut row = Vec::with_capacity(columns.len());
        for series in columns {
            let cell = series.utf8()?.get(i).unwrap_or("").to_string();
            row.push(cell);
        }
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn read_spreadsheet(path: &Path) -> DashResult<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| DashError::spreadsheet_with_source("failed to open workbook", e))?;

    // First worksheet, same as the usual spreadsheet-reader default
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DashError::spreadsheet("workbook has no worksheets"))?
        .map_err(|e| DashError::spreadsheet_with_source("failed to read worksheet", e))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| DashError::spreadsheet("worksheet is empty"))?
        .iter()
        .map(cell_to_string)
        .collect();

    let rows: Vec<Vec<String>> = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Trim and title-case a header, word boundaries at any non-letter.
/// "BOM QTY", "bom qty" and " Bom Qty " all normalize to "Bom Qty";
/// "11(a/i/f)" normalizes to "11(A/I/F)".
pub fn normalize_header(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.trim().chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Resolve required columns and detect test-stage columns. All missing
/// required columns are reported at once.
pub fn resolve_columns(headers: &[String], stage_marker: &str) -> DashResult<ColumnMap> {
    let find = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| find(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DashError::missing_columns(missing));
    }

    let stage_columns: Vec<StageColumn> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.contains(stage_marker))
        .map(|(index, h)| StageColumn {
            index,
            name: h.clone(),
        })
        .collect();

    Ok(ColumnMap {
        section: find("Section").unwrap(),
        nomenclature: find("Nomenclature").unwrap(),
        bom_qty: find("Bom Qty").unwrap(),
        stock: find("Stock").unwrap(),
        available_up_to: find("Available Up To").unwrap(),
        stage_columns,
    })
}
