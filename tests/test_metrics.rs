//! Unit tests for summary metrics, group statistics and missingness

use polars::prelude::*;
use scorelens::pipeline::{
    average, group_mean, group_quartiles, max, min, missingness, parse_csv_bytes, pass_rate,
    AnalysisConfig, ColumnKind, MetricError, ScoreOverview,
};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_average_min_max() {
    let df = common::create_student_dataframe();

    common::assert_close(average(&df, "Exam_Score").unwrap(), 865.0 / 12.0, 1e-9);
    assert_eq!(min(&df, "Exam_Score").unwrap(), 50.0);
    assert_eq!(max(&df, "Exam_Score").unwrap(), 95.0);
}

#[test]
fn test_average_skips_nulls() {
    let df = common::create_student_dataframe();

    // 11 non-null sleep values summing to 77.5
    common::assert_close(average(&df, "Sleep_Hours").unwrap(), 77.5 / 11.0, 1e-9);
}

#[test]
fn test_pass_rate_on_score_ladder() {
    let df = common::create_score_ladder();

    assert_eq!(pass_rate(&df, "Exam_Score", 60.0).unwrap(), 80.0);
    assert_eq!(pass_rate(&df, "Exam_Score", 0.0).unwrap(), 100.0);
    assert_eq!(pass_rate(&df, "Exam_Score", 100.0).unwrap(), 0.0);
}

#[test]
fn test_pass_rate_counts_null_as_fail() {
    let df = df! {
        "Exam_Score" => [Some(70.0f64), None, Some(40.0), Some(60.0)],
    }
    .unwrap();

    assert_eq!(pass_rate(&df, "Exam_Score", 60.0).unwrap(), 50.0);
}

#[test]
fn test_missing_column_is_reported() {
    let df = common::create_student_dataframe();

    let result = average(&df, "Final_Grade");

    assert!(matches!(result, Err(MetricError::ColumnMissing(ref c)) if c == "Final_Grade"));
}

#[test]
fn test_categorical_column_is_rejected() {
    let df = common::create_student_dataframe();

    let result = average(&df, "Gender");

    assert!(matches!(
        result,
        Err(MetricError::WrongKind {
            found: ColumnKind::Categorical,
            ..
        })
    ));
}

#[test]
fn test_metrics_on_empty_frame_are_insufficient() {
    let df = common::create_student_dataframe().head(Some(0));

    assert!(average(&df, "Exam_Score").unwrap_err().is_insufficient_data());
    assert!(min(&df, "Exam_Score").unwrap_err().is_insufficient_data());
    assert!(max(&df, "Exam_Score").unwrap_err().is_insufficient_data());
    assert!(pass_rate(&df, "Exam_Score", 60.0)
        .unwrap_err()
        .is_insufficient_data());
    assert!(group_mean(&df, "Gender", "Exam_Score")
        .unwrap_err()
        .is_insufficient_data());
    assert!(missingness(&df).unwrap_err().is_insufficient_data());
}

#[test]
fn test_overview_deltas_against_full_dataset() {
    let df = common::create_student_dataframe();
    let config = AnalysisConfig::default();
    let female = df
        .filter(
            &df.column("Gender")
                .unwrap()
                .as_materialized_series()
                .equal("Female")
                .unwrap(),
        )
        .unwrap();

    let overview = ScoreOverview::compute(&female, &df, &config);

    assert!(overview.is_filtered());
    assert_eq!(overview.rows, 6);
    assert_eq!(overview.total_rows, 12);
    common::assert_close(*overview.average.as_ref().unwrap(), 443.0 / 6.0, 1e-9);
    common::assert_close(
        *overview.average_delta.as_ref().unwrap(),
        443.0 / 6.0 - 865.0 / 12.0,
        1e-9,
    );
    // Female scores below 60: 55 only
    common::assert_close(*overview.pass_rate.as_ref().unwrap(), 500.0 / 6.0, 1e-9);
    let range = overview.range.as_ref().unwrap();
    assert_eq!((range.min, range.max), (55.0, 95.0));
}

#[test]
fn test_overview_unfiltered_has_zero_delta() {
    let df = common::create_student_dataframe();

    let overview = ScoreOverview::compute(&df, &df, &AnalysisConfig::default());

    assert!(!overview.is_filtered());
    assert_eq!(*overview.average_delta.as_ref().unwrap(), 0.0);
    assert_eq!(*overview.pass_rate_delta.as_ref().unwrap(), 0.0);
}

#[test]
fn test_overview_on_empty_filter_degrades() {
    let df = common::create_student_dataframe();
    let empty = df.head(Some(0));

    let overview = ScoreOverview::compute(&empty, &df, &AnalysisConfig::default());

    assert_eq!(overview.rows, 0);
    assert!(overview.average.is_err());
    assert!(overview.average_delta.is_err());
    assert!(overview.pass_rate.is_err());
    assert!(overview.range.is_err());
}

#[test]
fn test_group_mean_orders_by_mean_descending() {
    let df = common::create_student_dataframe();

    let stats = group_mean(&df, "School_Type", "Exam_Score").unwrap();

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].category, "Private");
    common::assert_close(stats[0].mean, 73.6, 1e-9);
    assert_eq!(stats[0].count, 5);
    assert_eq!(stats[1].category, "Public");
    common::assert_close(stats[1].mean, 71.0, 1e-9);
    assert_eq!(stats[1].count, 7);
}

#[test]
fn test_group_mean_ties_keep_label_order() {
    let df = df! {
        "Tier" => ["b", "a", "c", "b", "a", "c"],
        "Exam_Score" => [70i64, 70, 90, 70, 70, 90],
    }
    .unwrap();

    let stats = group_mean(&df, "Tier", "Exam_Score").unwrap();
    let order: Vec<&str> = stats.iter().map(|s| s.category.as_str()).collect();

    assert_eq!(order, vec!["c", "a", "b"]);
}

#[test]
fn test_group_mean_skips_null_keys() {
    let df = df! {
        "Tier" => [Some("a"), None, Some("a"), Some("b")],
        "Exam_Score" => [60i64, 100, 80, 50],
    }
    .unwrap();

    let stats = group_mean(&df, "Tier", "Exam_Score").unwrap();

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].category, "a");
    assert_eq!(stats[0].mean, 70.0);
}

#[test]
fn test_group_mean_needs_two_rows() {
    let df = common::create_student_dataframe().head(Some(1));

    let result = group_mean(&df, "Gender", "Exam_Score");

    assert!(matches!(result, Err(MetricError::InsufficientData(_))));
}

#[test]
fn test_group_mean_rejects_numeric_key() {
    let df = common::create_student_dataframe();

    let result = group_mean(&df, "Hours_Studied", "Exam_Score");

    assert!(matches!(result, Err(MetricError::WrongKind { .. })));
}

#[test]
fn test_group_quartiles_in_label_order() {
    let df = common::create_student_dataframe();

    let boxes = group_quartiles(&df, "Gender", "Exam_Score").unwrap();

    assert_eq!(boxes[0].category, "Female");
    assert_eq!(boxes[0].min, 55.0);
    assert_eq!(boxes[0].max, 95.0);
    // Female sorted: 55 65 68 75 85 95
    common::assert_close(boxes[0].median, 71.5, 1e-9);
    assert_eq!(boxes[1].category, "Male");
    assert_eq!(boxes[1].count, 6);
}

#[test]
fn test_group_quartiles_refuses_many_categories() {
    let df = common::create_student_dataframe();

    let result = group_quartiles(&df, "Student_Id", "Exam_Score");

    assert!(matches!(
        result,
        Err(MetricError::TooManyCategories { distinct: 12, .. })
    ));
}

#[test]
fn test_missingness_reports_only_incomplete_columns() {
    let df = common::create_student_dataframe();

    let entries = missingness(&df).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].column, "Sleep_Hours");
    assert_eq!(entries[0].count, 1);
    common::assert_close(entries[0].percent, 100.0 / 12.0, 1e-9);
}

#[test]
fn test_missingness_complete_data() {
    let df = common::create_score_ladder();

    assert!(missingness(&df).unwrap().is_empty());
}

#[test]
fn test_missing_value_tokens_count_as_missing() {
    for token in ["NA", "NaN"] {
        let csv = format!("Exam_Score,Hours\n70,1\n{},2\n80,3\n", token);
        let df = parse_csv_bytes(csv.as_bytes(), 100).unwrap();

        assert_eq!(average(&df, "Exam_Score").unwrap(), 75.0, "token {}", token);
        let entries = missingness(&df).unwrap();
        assert_eq!(entries.len(), 1, "token {}", token);
        assert_eq!(entries[0].column, "Exam_Score");
        assert_eq!(entries[0].count, 1);
    }
}

#[test]
fn test_float_nan_is_treated_as_absent() {
    let df = df! {
        "Exam_Score" => [70.0f64, f64::NAN, 80.0],
    }
    .unwrap();

    assert_eq!(average(&df, "Exam_Score").unwrap(), 75.0);
    assert_eq!(min(&df, "Exam_Score").unwrap(), 70.0);
    // NaN is not a passing score but stays in the denominator
    common::assert_close(pass_rate(&df, "Exam_Score", 60.0).unwrap(), 200.0 / 3.0, 1e-9);

    let entries = missingness(&df).unwrap();
    assert_eq!(entries[0].count, 1);
    common::assert_close(entries[0].percent, 100.0 / 3.0, 1e-9);
}
