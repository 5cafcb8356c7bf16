//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use scorelens::pipeline::{LocalObjectStore, ObjectLocation, DEFAULT_BUCKET, DEFAULT_KEY};
use tempfile::TempDir;

/// Create a small student dataset with known characteristics
///
/// This DataFrame includes:
/// - `Hours_Studied`: rises with the score
/// - `Absences`: exactly `100 - Exam_Score` (perfect negative correlation)
/// - `Sleep_Hours`: one missing value
/// - `Gender`, `School_Type`: low-cardinality categoricals
/// - `Student_Id`: 12 distinct labels, too many to filter on
/// - `Exam_Score`: outcome
pub fn create_student_dataframe() -> DataFrame {
    df! {
        "Hours_Studied" => [10i64, 11, 12, 13, 15, 16, 18, 19, 22, 24, 15, 13],
        "Absences" => [50i64, 45, 40, 35, 30, 25, 20, 15, 10, 5, 28, 32],
        "Sleep_Hours" => [Some(7.0f64), None, Some(6.0), Some(8.0), Some(7.0), Some(6.5),
                          Some(7.5), Some(8.0), Some(6.0), Some(7.0), Some(8.0), Some(6.5)],
        "Gender" => ["Male", "Female", "Male", "Female", "Male", "Female",
                     "Male", "Female", "Male", "Female", "Male", "Female"],
        "School_Type" => ["Public", "Public", "Private", "Public", "Private", "Public",
                          "Private", "Public", "Private", "Public", "Public", "Private"],
        "Student_Id" => ["S01", "S02", "S03", "S04", "S05", "S06",
                         "S07", "S08", "S09", "S10", "S11", "S12"],
        "Exam_Score" => [50i64, 55, 60, 65, 70, 75, 80, 85, 90, 95, 72, 68],
    }
    .unwrap()
}

/// Ten scores from 50 to 95 in steps of 5
pub fn create_score_ladder() -> DataFrame {
    df! {
        "Exam_Score" => [50i64, 55, 60, 65, 70, 75, 80, 85, 90, 95],
    }
    .unwrap()
}

/// Serialize a DataFrame to CSV bytes
pub fn to_csv_bytes(df: &DataFrame) -> Vec<u8> {
    let mut df = df.clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer).finish(&mut df).unwrap();
    buffer
}

/// Create a local object store holding `df` at the default bucket/key
pub fn create_local_store(df: &DataFrame) -> (TempDir, LocalObjectStore, ObjectLocation) {
    let temp_dir = TempDir::new().unwrap();
    let bucket_dir = temp_dir.path().join(DEFAULT_BUCKET);
    std::fs::create_dir_all(&bucket_dir).unwrap();
    std::fs::write(bucket_dir.join(DEFAULT_KEY), to_csv_bytes(df)).unwrap();

    let store = LocalObjectStore::new(temp_dir.path());
    (temp_dir, store, ObjectLocation::default())
}

/// Assert that two floats agree within `tolerance`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} (±{}), got {}",
        expected,
        tolerance,
        actual
    );
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// String values of a column, nulls as `None`
pub fn string_values(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}
