//! Unit tests for correlation analysis

use polars::prelude::*;
use scorelens::pipeline::{
    correlation_matrix, correlation_table, pairwise_correlation, MetricError,
};

#[path = "common/mod.rs"]
mod common;

fn factors() -> Vec<String> {
    vec![
        "Hours_Studied".to_string(),
        "Absences".to_string(),
        "Sleep_Hours".to_string(),
    ]
}

#[test]
fn test_perfect_negative_correlation() {
    let df = common::create_student_dataframe();

    let r = pairwise_correlation(&df, "Absences", "Exam_Score").unwrap();

    common::assert_close(r, -1.0, 1e-9);
}

#[test]
fn test_perfect_positive_correlation() {
    let df = df! {
        "x" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "y" => [3.0f64, 5.0, 7.0, 9.0, 11.0],
    }
    .unwrap();

    common::assert_close(pairwise_correlation(&df, "x", "y").unwrap(), 1.0, 1e-9);
}

#[test]
fn test_correlation_is_symmetric() {
    let df = common::create_student_dataframe();

    let ab = pairwise_correlation(&df, "Hours_Studied", "Sleep_Hours").unwrap();
    let ba = pairwise_correlation(&df, "Sleep_Hours", "Hours_Studied").unwrap();

    common::assert_close(ab, ba, 1e-12);
    assert!((-1.0..=1.0).contains(&ab));
}

#[test]
fn test_constant_column_is_undefined() {
    let df = df! {
        "flat" => [5i64, 5, 5, 5],
        "Exam_Score" => [60i64, 70, 80, 90],
    }
    .unwrap();

    let result = pairwise_correlation(&df, "flat", "Exam_Score");

    assert!(matches!(result, Err(MetricError::InsufficientData(_))));
}

#[test]
fn test_single_row_is_undefined() {
    let df = common::create_student_dataframe().head(Some(1));

    let result = pairwise_correlation(&df, "Absences", "Exam_Score");

    assert!(matches!(result, Err(MetricError::InsufficientData(_))));
}

#[test]
fn test_correlation_rejects_categorical() {
    let df = common::create_student_dataframe();

    let result = pairwise_correlation(&df, "Gender", "Exam_Score");

    assert!(matches!(result, Err(MetricError::WrongKind { .. })));
}

#[test]
fn test_correlation_table_follows_factor_order() {
    let df = common::create_student_dataframe();

    let table = correlation_table(&df, &factors(), "Exam_Score").unwrap();

    let names: Vec<&str> = table.iter().map(|e| e.factor.as_str()).collect();
    assert_eq!(names, vec!["Hours_Studied", "Absences", "Sleep_Hours"]);
    common::assert_close(table[1].correlation.unwrap(), -1.0, 1e-9);
    assert!(table[0].correlation.unwrap() > 0.5);
}

#[test]
fn test_correlation_table_marks_undefined() {
    let df = df! {
        "flat" => [1.0f64, 1.0, 1.0],
        "rising" => [1.0f64, 2.0, 3.0],
        "Exam_Score" => [50.0f64, 60.0, 70.0],
    }
    .unwrap();

    let table = correlation_table(
        &df,
        &["flat".to_string(), "rising".to_string()],
        "Exam_Score",
    )
    .unwrap();

    assert_eq!(table[0].correlation, None);
    common::assert_close(table[1].correlation.unwrap(), 1.0, 1e-9);
}

#[test]
fn test_matrix_symmetric_with_unit_diagonal() {
    let df = common::create_student_dataframe();

    let matrix = correlation_matrix(&df, &factors(), "Exam_Score").unwrap();

    assert_eq!(matrix.len(), 4);
    assert_eq!(matrix.names().last().map(String::as_str), Some("Exam_Score"));
    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), Some(1.0));
        for j in 0..matrix.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
        }
    }
    common::assert_close(
        matrix.get_by_name("Absences", "Exam_Score").unwrap(),
        -1.0,
        1e-9,
    );
}

#[test]
fn test_matrix_undefined_entries_are_none() {
    let df = df! {
        "flat" => [2.0f64, 2.0, 2.0],
        "Exam_Score" => [50.0f64, 60.0, 70.0],
    }
    .unwrap();

    let matrix = correlation_matrix(&df, &["flat".to_string()], "Exam_Score").unwrap();

    assert_eq!(matrix.get_by_name("flat", "Exam_Score"), None);
    assert_eq!(matrix.to_rows()[0], vec![Some(1.0), None]);
}

#[test]
fn test_matrix_needs_two_columns() {
    let df = common::create_score_ladder();

    let result = correlation_matrix(&df, &[], "Exam_Score");

    assert!(matches!(result, Err(MetricError::InsufficientData(_))));
}

#[test]
fn test_matrix_needs_two_rows() {
    let df = common::create_student_dataframe().head(Some(1));

    let result = correlation_matrix(&df, &factors(), "Exam_Score");

    assert!(matches!(result, Err(MetricError::InsufficientData(_))));
}
