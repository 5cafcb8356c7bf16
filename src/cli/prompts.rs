//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{Confirm, MultiSelect};

use crate::pipeline::{ColumnClassification, FilterSelection};
use crate::utils::display_name;

/// Filters offered interactively, to keep the prompt list short
pub const MAX_PROMPTED_FILTERS: usize = 3;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}

/// Ask for the values to keep in each eligible categorical column.
///
/// Current choices are pre-ticked. Selecting nothing leaves the column
/// unrestricted.
pub fn prompt_filters(
    classification: &ColumnClassification,
    current: &FilterSelection,
) -> Result<FilterSelection> {
    let mut selection = current.clone();

    for profile in classification
        .eligible_filters()
        .into_iter()
        .take(MAX_PROMPTED_FILTERS)
    {
        let chosen = current.values(&profile.name);
        let defaults: Vec<bool> = profile
            .values
            .iter()
            .map(|v| chosen.is_some_and(|c| c.contains(v)))
            .collect();

        let picked = MultiSelect::new()
            .with_prompt(format!("Filter by {}", display_name(&profile.name)))
            .items(&profile.values)
            .defaults(&defaults)
            .interact()?;

        selection.set(
            &profile.name,
            picked.into_iter().map(|i| profile.values[i].clone()),
        );
    }

    Ok(selection)
}
