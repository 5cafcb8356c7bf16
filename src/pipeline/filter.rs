//! Row filtering by categorical value membership

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;

use super::error::FilterError;
use super::schema::ColumnClassification;

/// Chosen values per categorical column.
///
/// A column with an empty value set imposes no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    choices: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSelection::set`]
    pub fn with<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(column, values);
        self
    }

    /// Replace the chosen values of a column
    pub fn set<I, S>(&mut self, column: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices.insert(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        );
    }

    pub fn clear(&mut self, column: &str) {
        self.choices.remove(column);
    }

    pub fn values(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.choices.get(column)
    }

    /// Columns with a non-empty selection
    pub fn active(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.choices.iter().filter(|(_, values)| !values.is_empty())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.active().next().is_none()
    }

    /// Parse a `COLUMN=VALUE[,VALUE...]` argument and merge it in
    pub fn parse_arg(&mut self, arg: &str) -> Result<(), FilterError> {
        let (column, values) = arg
            .split_once('=')
            .ok_or_else(|| FilterError::InvalidSyntax(arg.to_string()))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(FilterError::InvalidSyntax(arg.to_string()));
        }

        let entry = self.choices.entry(column.to_string()).or_default();
        entry.extend(
            values
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        );
        Ok(())
    }
}

/// Check a selection against the dataset's categorical profiles.
///
/// Every active column must be categorical with fewer than
/// [`MAX_FILTER_CARDINALITY`](super::schema::MAX_FILTER_CARDINALITY)
/// distinct values, and every chosen value must have been observed.
pub fn validate_selection(
    classification: &ColumnClassification,
    selection: &FilterSelection,
) -> Result<(), FilterError> {
    for (column, values) in selection.active() {
        let profile = classification
            .profile(column)
            .ok_or_else(|| FilterError::UnknownColumn(column.clone()))?;

        if !profile.is_filter_eligible() {
            return Err(FilterError::Ineligible {
                column: column.clone(),
                distinct: profile.distinct,
            });
        }

        if let Some(value) = values.iter().find(|v| !profile.contains(v)) {
            return Err(FilterError::UnknownValue {
                column: column.clone(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

/// Keep the rows whose value is selected in every active column.
///
/// Columns and row order are preserved. A selection that matches nothing
/// returns a zero-row frame with the full schema.
pub fn apply_filters(
    df: &DataFrame,
    classification: &ColumnClassification,
    selection: &FilterSelection,
) -> Result<DataFrame, FilterError> {
    validate_selection(classification, selection)?;

    if selection.is_unrestricted() {
        return Ok(df.clone());
    }

    let mut keep = vec![true; df.height()];
    for (column, values) in selection.active() {
        let ca = df.column(column)?.as_materialized_series().str()?;
        for (flag, value) in keep.iter_mut().zip(ca.into_iter()) {
            if *flag {
                *flag = value.is_some_and(|v| values.contains(v));
            }
        }
    }

    let mask: BooleanChunked = keep.into_iter().collect();
    Ok(df.filter(&mask)?)
}

/// Share of the original rows that survived filtering, as a percentage
pub fn retained_percent(filtered_rows: usize, total_rows: usize) -> Option<f64> {
    if total_rows == 0 {
        None
    } else {
        Some(filtered_rows as f64 / total_rows as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arg_merges_values() {
        let mut selection = FilterSelection::new();
        selection.parse_arg("Gender=Male, Female").unwrap();
        selection.parse_arg("Gender=Other").unwrap();

        let values = selection.values("Gender").unwrap();
        assert_eq!(values.len(), 3);
        assert!(values.contains("Female"));
    }

    #[test]
    fn test_parse_arg_rejects_missing_equals() {
        let mut selection = FilterSelection::new();
        assert!(matches!(
            selection.parse_arg("Gender"),
            Err(FilterError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_empty_value_set_is_unrestricted() {
        let selection = FilterSelection::new().with("Gender", Vec::<String>::new());
        assert!(selection.is_unrestricted());
    }
}
