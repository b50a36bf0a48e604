use std::io::Write;
use tempfile::tempdir;

use bomdash::analyzer::Snapshot;
use bomdash::config::DashConfig;
use bomdash::error::DashError;
use bomdash::export::{self, ExportFormat};
use bomdash::filter::FilterSelection;
use bomdash::ingest;

fn write_csv(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

const SAMPLE: &str = "\
Section,Nomenclature,Bom Qty,Stock,Available Up To,T1(A/I/F),T2(A/I/F)
Propulsion,Engine,-,,,,
Propulsion,Piston,2,4,AP 25,A,S
Propulsion,Crankshaft,3,0,AP100,A,A
";

#[test]
fn test_end_to_end_engine_scenario() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "bom.csv", SAMPLE);

    let config = DashConfig::default();
    let table = ingest::load_table(&path, &config).unwrap();
    assert_eq!(table.columns.stage_columns.len(), 2);

    let snapshot = Snapshot::compute(&table, &FilterSelection::default(), &config);

    // Heading row dropped, both data rows categorized under ENGINE
    assert_eq!(snapshot.rows.len(), 2);
    assert!(snapshot
        .rows
        .iter()
        .all(|r| r.category.as_deref() == Some("ENGINE")));
    assert_eq!(snapshot.rows[0].available_in, 1);
    assert_eq!(snapshot.rows[1].available_in, 2);

    assert_eq!(snapshot.summary.used_in_all, 1);
    assert_eq!(snapshot.summary.used_in_none, 0);
    assert!((snapshot.summary.mean_available_in.unwrap() - 1.5).abs() < 1e-9);

    // Available Up To normalization
    assert_eq!(snapshot.rows[0].available_up_to, Some(25));
    assert_eq!(snapshot.rows[1].available_up_to, Some(100));

    // Cross-check: row sums equal column sums
    let row_sum: usize = snapshot.rows.iter().map(|r| r.available_in).sum();
    let col_sum: usize = snapshot.stage_totals.iter().map(|t| t.available).sum();
    assert_eq!(row_sum, col_sum);
    assert_eq!(snapshot.overall.available, 3);
    assert_eq!(snapshot.overall.short, 1);

    // Crankshaft has zero stock -> critical
    let critical: Vec<&str> = snapshot
        .critical_rows()
        .map(|r| r.nomenclature.as_str())
        .collect();
    assert_eq!(critical, vec!["Crankshaft"]);
}

#[test]
fn test_stage_filter_restricts_to_available_rows() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "bom.csv", SAMPLE);
    let config = DashConfig::default();
    let table = ingest::load_table(&path, &config).unwrap();

    // T2 is "A" only for Crankshaft
    let selection = FilterSelection {
        stage_column: Some(1),
        ..Default::default()
    };
    let snapshot = Snapshot::compute(&table, &selection, &config);
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.rows[0].nomenclature, "Crankshaft");
}

#[test]
fn test_empty_filter_result_is_well_defined() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "bom.csv", SAMPLE);
    let config = DashConfig::default();
    let table = ingest::load_table(&path, &config).unwrap();

    let selection = FilterSelection {
        section: Some("Avionics".to_string()),
        ..Default::default()
    };
    let snapshot = Snapshot::compute(&table, &selection, &config);
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.summary.total_components, 0);
    assert_eq!(snapshot.summary.mean_available_in, None);
    assert!(snapshot.critical.is_empty());
    assert!(snapshot.heatmap.rows.is_empty());
}

#[test]
fn test_missing_required_column_is_reported() {
    let dir = tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "bad.csv",
        "Section,Nomenclature,Stock\nS1,Engine,4\n",
    );
    let err = ingest::load_table(&path, &DashConfig::default()).unwrap_err();
    match err {
        DashError::MissingColumns { columns } => {
            assert!(columns.contains(&"Bom Qty".to_string()));
            assert!(columns.contains(&"Available Up To".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_export_round_trip_preserves_filtered_rows() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "bom.csv", SAMPLE);
    let config = DashConfig::default();
    let table = ingest::load_table(&path, &config).unwrap();
    let snapshot = Snapshot::compute(&table, &FilterSelection::default(), &config);

    let out = dir.path().join("filtered.csv");
    export::export_rows(&snapshot.rows, &snapshot.stage_names, &out, ExportFormat::Csv).unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert!(header.contains("Nomenclature"));
    assert!(header.contains("T2(A/I/F)"));
    assert!(!header.starts_with(","), "no index column expected");
    assert_eq!(lines.count(), 2);
}

#[test]
fn test_no_stage_columns_is_not_fatal() {
    let dir = tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "bom.csv",
        "Section,Nomenclature,Bom Qty,Stock,Available Up To\nS1,Engine,-,,\nS1,Piston,2,4,AP 5\n",
    );
    let config = DashConfig::default();
    let table = ingest::load_table(&path, &config).unwrap();
    let selection = FilterSelection::default();
    let snapshot = Snapshot::compute(&table, &selection, &config);

    assert!(!snapshot.has_stage_columns());
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.summary.used_in_all, 0);
    assert_eq!(snapshot.overall.available_ratio(), None);

    let text = bomdash::report::render(&snapshot, &selection, &config);
    assert!(text.contains("No test-stage columns found"));
}
