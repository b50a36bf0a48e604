//! Export of the current filtered table, built the DataFrame way: one vector
//! per output column, then a polars writer. Header included, no index column.

use anyhow::Result;
use clap::ValueEnum;
use polars::prelude::*;
use std::path::Path;
use tracing::info;

use crate::model::ComponentRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Build the export DataFrame: fixed columns, then one column per detected
/// test-stage column (original status codes), then the derived Available In.
pub fn to_dataframe(rows: &[ComponentRow], stage_names: &[String]) -> Result<DataFrame> {
    let mut sections = Vec::with_capacity(rows.len());
    let mut categories: Vec<Option<String>> = Vec::with_capacity(rows.len());
    let mut nomenclatures = Vec::with_capacity(rows.len());
    let mut bom_qtys = Vec::with_capacity(rows.len());
    let mut stocks: Vec<Option<i64>> = Vec::with_capacity(rows.len());
    let mut available_up_to: Vec<Option<i64>> = Vec::with_capacity(rows.len());
    let mut available_in: Vec<i64> = Vec::with_capacity(rows.len());

    for row in rows {
        sections.push(row.section.clone());
        categories.push(row.category.clone());
        nomenclatures.push(row.nomenclature.clone());
        bom_qtys.push(row.bom_qty);
        stocks.push(row.stock);
        available_up_to.push(row.available_up_to.map(i64::from));
        available_in.push(row.available_in as i64);
    }

    let mut columns = vec![
        Series::new("Section", sections),
        Series::new("Category", categories),
        Series::new("Nomenclature", nomenclatures),
        Series::new("Bom Qty", bom_qtys),
        Series::new("Stock", stocks),
        Series::new("Available Up To", available_up_to),
    ];

    for (stage, name) in stage_names.iter().enumerate() {
        let codes: Vec<String> = rows
            .iter()
            .map(|r| {
                r.statuses
                    .get(stage)
                    .map(|s| s.code().to_string())
                    .unwrap_or_default()
            })
            .collect();
        columns.push(Series::new(name, codes));
    }

    columns.push(Series::new("Available In", available_in));

    Ok(DataFrame::new(columns)?)
}

/// Write the filtered table to disk in the requested format.
pub fn export_rows(
    rows: &[ComponentRow],
    stage_names: &[String],
    output_path: &Path,
    format: ExportFormat,
) -> Result<()> {
    let mut df = to_dataframe(rows, stage_names)?;
    let mut file = std::fs::File::create(output_path)?;

    match format {
        ExportFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)?;
        }
        ExportFormat::Json => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(&mut df)?;
        }
    }

    info!(
        rows = df.height(),
        "Export completed: {}",
        output_path.display()
    );
    Ok(())
}
