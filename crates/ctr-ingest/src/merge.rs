//! Merging of several offline exports of the same project.
//!
//! Offline exports are often saved per instrument or per export date. Merging
//! lines them up by record (and event/repeat instance for longitudinal
//! projects) so the transforms see one flat table.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use tracing::debug;

use ctr_common::{column_names, column_strings, string_column};
use ctr_model::conventions::EVENT_KEY_COLUMNS;

use crate::error::{IngestError, Result};

const KEY_SEPARATOR: char = '\u{1f}';

/// Outer-merges exports keyed on the row id and any REDCap event columns.
///
/// Columns are unioned in first-seen order and rows keep first-seen order.
/// When two exports supply the same cell, the later export wins. Cells no
/// export supplies are null.
pub fn merge_exports(frames: &[DataFrame], row_id: &str) -> Result<DataFrame> {
    let mut columns: Vec<String> = Vec::new();
    let mut column_index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    let mut row_index: HashMap<String, usize> = HashMap::new();

    for (frame_idx, frame) in frames.iter().enumerate() {
        let names = column_names(frame);
        if !names.iter().any(|name| name == row_id) {
            return Err(IngestError::MissingRowId {
                index: frame_idx,
                row_id: row_id.to_string(),
            });
        }
        for name in &names {
            if !column_index.contains_key(name) {
                column_index.insert(name.clone(), columns.len());
                columns.push(name.clone());
            }
        }

        let key_columns: Vec<&str> = std::iter::once(row_id)
            .chain(
                EVENT_KEY_COLUMNS
                    .iter()
                    .copied()
                    .filter(|key| names.iter().any(|name| name == key)),
            )
            .collect();
        let cells: Vec<Vec<String>> = names
            .iter()
            .map(|name| column_strings(frame, name).unwrap_or_default())
            .collect();
        let key_cells: Vec<Vec<String>> = key_columns
            .iter()
            .map(|name| column_strings(frame, name).unwrap_or_default())
            .collect();

        for row in 0..frame.height() {
            let key = row_key(&key_cells, row);
            let existing = key.as_ref().and_then(|key| row_index.get(key).copied());
            let target = match existing {
                Some(position) => position,
                None => {
                    rows.push(Vec::new());
                    let position = rows.len() - 1;
                    if let Some(key) = key {
                        row_index.insert(key, position);
                    }
                    position
                }
            };
            let target_row = &mut rows[target];
            if target_row.len() < columns.len() {
                target_row.resize(columns.len(), None);
            }
            for (name, values) in names.iter().zip(&cells) {
                let column = column_index[name];
                target_row[column] = values.get(row).cloned();
            }
        }
        debug!(export = frame_idx, rows = frame.height(), "merged export");
    }

    let output = columns
        .iter()
        .enumerate()
        .map(|(column, name)| {
            let values = rows
                .iter()
                .map(|row| row.get(column).cloned().flatten())
                .collect();
            string_column(name, values)
        })
        .collect();
    Ok(DataFrame::new(output)?)
}

/// Key of a row; rows with a blank record id are never merged.
fn row_key(key_cells: &[Vec<String>], row: usize) -> Option<String> {
    let record = key_cells.first()?.get(row)?.trim();
    if record.is_empty() {
        return None;
    }
    let mut key = record.to_string();
    for cells in &key_cells[1..] {
        key.push(KEY_SEPARATOR);
        key.push_str(cells.get(row).map(|cell| cell.trim()).unwrap_or(""));
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_from_csv_str;

    #[test]
    fn later_export_overwrites_shared_cells() {
        let first = frame_from_csv_str("record_id,age\n1,30\n2,40\n").unwrap();
        let second = frame_from_csv_str("record_id,age,sex\n2,41,1\n3,50,2\n").unwrap();
        let merged = merge_exports(&[first, second], "record_id").unwrap();

        assert_eq!(column_names(&merged), vec!["record_id", "age", "sex"]);
        assert_eq!(
            column_strings(&merged, "record_id"),
            Some(vec!["1".to_string(), "2".to_string(), "3".to_string()])
        );
        assert_eq!(
            column_strings(&merged, "age"),
            Some(vec!["30".to_string(), "41".to_string(), "50".to_string()])
        );
        assert_eq!(
            column_strings(&merged, "sex"),
            Some(vec![String::new(), "1".to_string(), "2".to_string()])
        );
        assert_eq!(merged.column("sex").unwrap().null_count(), 1);
    }

    #[test]
    fn events_are_part_of_the_key() {
        let export = frame_from_csv_str(
            "record_id,redcap_event_name,weight\n1,baseline_arm_1,70\n1,week_4_arm_1,68\n",
        )
        .unwrap();
        let merged = merge_exports(&[export], "record_id").unwrap();
        assert_eq!(merged.height(), 2);
    }

    #[test]
    fn missing_row_id_is_an_error() {
        let export = frame_from_csv_str("id,age\n1,30\n").unwrap();
        let error = merge_exports(&[export], "record_id").unwrap_err();
        assert!(matches!(error, IngestError::MissingRowId { index: 0, .. }));
    }
}
