//! Regrouping of checkbox dummy columns.
//!
//! A REDCap checkbox field `race` with options 1..5 exports as `race___1` ..
//! `race___5`, each holding a 0/1 indicator. The regrouper adds a `race`
//! column listing the selected codes (`1,3`) right before the first dummy.

use std::collections::{HashMap, HashSet};

use polars::prelude::{Column, DataFrame};
use tracing::debug;

use ctr_common::{column_names, column_strings, string_column};
use ctr_model::conventions::{SELECTED_INDICATOR, split_checkbox_column};

use crate::error::Result;
use crate::families::{CheckboxFamily, discover_checkbox_families};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegroupOptions {
    /// Remove the dummy columns once their family is regrouped.
    pub drop_dummies: bool,
}

#[derive(Debug, Clone)]
pub struct RegroupOutcome {
    pub frame: DataFrame,
    pub families: Vec<CheckboxFamily>,
}

/// Regroups every checkbox family, keeping the dummy columns.
pub fn regroup_checkboxes(df: DataFrame) -> Result<DataFrame> {
    Ok(regroup_checkboxes_with_options(df, RegroupOptions::default())?.frame)
}

/// Adds one grouped column per checkbox family.
///
/// The grouped column holds the selected codes joined with `,` in dummy
/// column order, or an empty string when nothing is selected. It is placed
/// where the family's first dummy sits; a pre-existing column with the base
/// name is replaced and moved there. Re-running on the output changes
/// nothing.
pub fn regroup_checkboxes_with_options(
    df: DataFrame,
    options: RegroupOptions,
) -> Result<RegroupOutcome> {
    let families = discover_checkbox_families(&column_names(&df));
    if families.is_empty() {
        return Ok(RegroupOutcome {
            frame: df,
            families,
        });
    }

    let mut grouped: HashMap<&str, Column> = HashMap::new();
    for family in &families {
        let first = family.first_column().unwrap_or_default();
        grouped.insert(first, grouped_column(&df, family));
        debug!(
            field = %family.base,
            options = family.options.len(),
            "regrouped checkbox field"
        );
    }
    let bases: HashSet<&str> = families.iter().map(|family| family.base.as_str()).collect();

    let mut columns = Vec::with_capacity(df.width() + families.len());
    for column in df.get_columns() {
        let name = column.name().as_str();
        if bases.contains(name) {
            continue;
        }
        if let Some(group) = grouped.remove(name) {
            columns.push(group);
        }
        if options.drop_dummies && split_checkbox_column(name).is_some() {
            continue;
        }
        columns.push(column.clone());
    }

    let frame = DataFrame::new(columns)?;
    Ok(RegroupOutcome { frame, families })
}

fn grouped_column(df: &DataFrame, family: &CheckboxFamily) -> Column {
    let indicators: Vec<Vec<String>> = family
        .options
        .iter()
        .map(|option| column_strings(df, &option.column).unwrap_or_default())
        .collect();
    let values = (0..df.height())
        .map(|row| {
            let selected: Vec<&str> = family
                .options
                .iter()
                .zip(&indicators)
                .filter(|(_, cells)| cells.get(row).is_some_and(|cell| is_selected(cell)))
                .map(|(option, _)| option.code.as_str())
                .collect();
            Some(selected.join(","))
        })
        .collect();
    string_column(&family.base, values)
}

/// True when an indicator cell marks its option as selected.
///
/// Accepts the text indicator as well as numeric renderings such as `1.0`.
pub fn is_selected(value: &str) -> bool {
    let value = value.trim();
    value == SELECTED_INDICATOR || value.parse::<f64>().is_ok_and(|number| number == 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_values() {
        assert!(is_selected("1"));
        assert!(is_selected(" 1.0 "));
        assert!(!is_selected("0"));
        assert!(!is_selected(""));
        assert!(!is_selected("yes"));
        assert!(!is_selected("11"));
    }

    #[test]
    fn frame_without_checkboxes_is_returned_as_is() {
        let df = DataFrame::new(vec![string_column(
            "record_id",
            vec![Some("1".to_string())],
        )])
        .unwrap();
        let outcome = regroup_checkboxes_with_options(df.clone(), RegroupOptions::default()).unwrap();
        assert!(outcome.families.is_empty());
        assert!(outcome.frame.equals_missing(&df));
    }
}
