//! Replacement of raw choice codes with dictionary labels.

use polars::prelude::DataFrame;
use tracing::debug;

use ctr_common::{column_optional_strings, string_column};
use ctr_model::conventions::split_checkbox_column;
use ctr_model::{DataDictionary, FieldMetadata, FieldType};

use crate::error::Result;

/// Separator between labels of a relabeled checkbox column.
pub const LABEL_SEPARATOR: &str = ", ";

#[derive(Debug, Clone)]
pub struct RelabelOutcome {
    pub frame: DataFrame,
    /// Columns whose codes were mapped, in frame order.
    pub relabeled: Vec<String>,
}

/// Maps coded values to their labels using the project data dictionary.
///
/// Single-choice fields (radio, dropdown, yes/no, true/false) have each cell
/// replaced by its label. Grouped checkbox columns have every comma-separated
/// code replaced. Codes the dictionary does not know, dummy columns and
/// columns absent from the dictionary are left as they are.
pub fn relabel(df: DataFrame, dictionary: &DataDictionary) -> Result<RelabelOutcome> {
    let mut relabeled = Vec::new();
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let name = column.name().as_str();
        let field = dictionary
            .field(name)
            .filter(|_| split_checkbox_column(name).is_none())
            .filter(|field| {
                field.field_type.is_categorical() || field.field_type == FieldType::Checkbox
            });
        let (Some(field), Some(cells)) = (field, column_optional_strings(&df, name)) else {
            columns.push(column.clone());
            continue;
        };
        let values = cells
            .into_iter()
            .map(|cell| cell.map(|value| label_cell(field, &value)))
            .collect();
        columns.push(string_column(name, values));
        relabeled.push(name.to_string());
    }
    debug!(columns = relabeled.len(), "relabeled coded columns");
    let frame = DataFrame::new(columns)?;
    Ok(RelabelOutcome { frame, relabeled })
}

fn label_cell(field: &FieldMetadata, value: &str) -> String {
    if field.field_type != FieldType::Checkbox {
        return field.label_for(value).unwrap_or_else(|| value.to_string());
    }
    if value.trim().is_empty() {
        return value.to_string();
    }
    value
        .split(',')
        .map(|code| field.label_for(code).unwrap_or_else(|| code.trim().to_string()))
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}
