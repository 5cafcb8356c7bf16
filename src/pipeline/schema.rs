//! Column classification and categorical profiling

use std::collections::BTreeSet;
use std::fmt;

use polars::prelude::*;
use serde::Serialize;

/// Categorical columns with at least this many distinct values cannot be filtered.
pub const MAX_FILTER_CARDINALITY: usize = 10;

/// Kind of an analysable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnKind {
    /// Text labels
    Categorical,
    /// Integer or float values
    Numerical,
}

impl ColumnKind {
    /// Map a polars dtype onto a column kind. Unrecognised dtypes yield `None`.
    pub fn from_dtype(dtype: &DataType) -> Option<Self> {
        if matches!(dtype, DataType::String) {
            Some(ColumnKind::Categorical)
        } else if dtype.is_primitive_numeric() {
            Some(ColumnKind::Numerical)
        } else {
            None
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Numerical => write!(f, "numerical"),
        }
    }
}

/// Cardinality and observed labels of a categorical column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalProfile {
    pub name: String,
    /// Number of distinct values, counting null as one value when present
    pub distinct: usize,
    /// Sorted non-null observed values
    pub values: Vec<String>,
}

impl CategoricalProfile {
    pub fn is_filter_eligible(&self) -> bool {
        self.distinct < MAX_FILTER_CARDINALITY
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.binary_search_by(|v| v.as_str().cmp(value)).is_ok()
    }
}

/// Partition of a dataset's columns into categorical and numerical groups.
///
/// Both lists keep the dataset's column order. A column whose dtype is
/// neither text nor numeric appears in neither list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnClassification {
    pub categorical: Vec<String>,
    pub numerical: Vec<String>,
    pub profiles: Vec<CategoricalProfile>,
}

impl ColumnClassification {
    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        if self.categorical.iter().any(|c| c == column) {
            Some(ColumnKind::Categorical)
        } else if self.numerical.iter().any(|c| c == column) {
            Some(ColumnKind::Numerical)
        } else {
            None
        }
    }

    pub fn profile(&self, column: &str) -> Option<&CategoricalProfile> {
        self.profiles.iter().find(|p| p.name == column)
    }

    /// Categorical columns that may carry a filter selection
    pub fn eligible_filters(&self) -> Vec<&CategoricalProfile> {
        self.profiles
            .iter()
            .filter(|p| p.is_filter_eligible())
            .collect()
    }

    /// Numerical columns other than the outcome
    pub fn factors(&self, outcome: &str) -> Vec<String> {
        self.numerical
            .iter()
            .filter(|c| c.as_str() != outcome)
            .cloned()
            .collect()
    }
}

/// Classify every column of the frame by dtype and profile the categorical ones.
pub fn classify(df: &DataFrame) -> PolarsResult<ColumnClassification> {
    let mut classification = ColumnClassification::default();

    for column in df.get_columns() {
        let name = column.name().to_string();
        match ColumnKind::from_dtype(column.dtype()) {
            Some(ColumnKind::Categorical) => {
                classification
                    .profiles
                    .push(profile_categorical(&name, column)?);
                classification.categorical.push(name);
            }
            Some(ColumnKind::Numerical) => classification.numerical.push(name),
            None => {}
        }
    }

    Ok(classification)
}

fn profile_categorical(name: &str, column: &Column) -> PolarsResult<CategoricalProfile> {
    let ca = column.as_materialized_series().str()?;

    let mut values = BTreeSet::new();
    let mut has_null = false;
    for value in ca.into_iter() {
        match value {
            Some(v) => {
                values.insert(v.to_string());
            }
            None => has_null = true,
        }
    }

    Ok(CategoricalProfile {
        name: name.to_string(),
        distinct: values.len() + usize::from(has_null),
        values: values.into_iter().collect(),
    })
}
