//! Discovery of timestamp and checkbox column families.
//!
//! Families are found once from the column names of an export and validated
//! up front, so the transforms never meet a half-formed family mid-way.

use std::collections::BTreeSet;

use ctr_model::conventions::{
    archival_name, is_archival_timestamp, is_primary_timestamp, split_checkbox_column,
};

use crate::error::{Result, TransformError};

/// A primary timestamp field and its archival counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFamily {
    pub primary: String,
    pub archival: String,
}

/// One dummy column of a checkbox field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxOption {
    pub column: String,
    pub code: String,
}

/// A checkbox field and its dummy columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxFamily {
    pub base: String,
    pub options: Vec<CheckboxOption>,
}

impl CheckboxFamily {
    pub fn first_column(&self) -> Option<&str> {
        self.options.first().map(|option| option.column.as_str())
    }
}

/// Finds every timestamp family among `columns`.
///
/// The row identifier, checkbox dummies and the grouped column of any checkbox
/// family in `columns` are never treated as timestamps. Every primary field
/// must have its archival column, and every `<name>_arch` column carrying the
/// marker must belong to a primary field.
pub fn discover_timestamp_families(
    columns: &[String],
    row_id_column: &str,
) -> Result<Vec<TimestampFamily>> {
    let checkbox_bases: BTreeSet<String> = discover_checkbox_families(columns)
        .into_iter()
        .map(|family| family.base)
        .collect();
    let candidates: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|name| {
            *name != row_id_column
                && split_checkbox_column(name).is_none()
                && !checkbox_bases.contains(*name)
        })
        .collect();
    let present: BTreeSet<&str> = candidates.iter().copied().collect();

    let mut families = Vec::new();
    let mut paired = BTreeSet::new();
    for name in candidates.iter().copied().filter(|name| is_primary_timestamp(name)) {
        let archival = archival_name(name);
        if !present.contains(archival.as_str()) {
            return Err(TransformError::MissingArchivalColumn {
                field: name.to_string(),
                expected: archival,
            });
        }
        paired.insert(archival.clone());
        families.push(TimestampFamily {
            primary: name.to_string(),
            archival,
        });
    }

    if let Some(unpaired) = candidates
        .iter()
        .copied()
        .find(|name| is_archival_timestamp(name) && !paired.contains(*name))
    {
        return Err(TransformError::UnpairedArchivalColumn(unpaired.to_string()));
    }

    Ok(families)
}

/// Groups checkbox dummy columns by base field, in order of first dummy.
pub fn discover_checkbox_families(columns: &[String]) -> Vec<CheckboxFamily> {
    let mut families: Vec<CheckboxFamily> = Vec::new();
    for column in columns {
        let Some((base, code)) = split_checkbox_column(column) else {
            continue;
        };
        let option = CheckboxOption {
            column: column.clone(),
            code: code.to_string(),
        };
        match families.iter_mut().find(|family| family.base == base) {
            Some(family) => family.options.push(option),
            None => families.push(CheckboxFamily {
                base: base.to_string(),
                options: vec![option],
            }),
        }
    }
    families
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn pairs_primary_and_archival_fields() {
        let columns = names(&[
            "record_id",
            "visit_timestamp",
            "age",
            "visit_timestamp_arch",
            "consent_timestamp",
            "consent_timestamp_arch",
        ]);
        let families = discover_timestamp_families(&columns, "record_id").unwrap();
        assert_eq!(
            families,
            vec![
                TimestampFamily {
                    primary: "visit_timestamp".to_string(),
                    archival: "visit_timestamp_arch".to_string(),
                },
                TimestampFamily {
                    primary: "consent_timestamp".to_string(),
                    archival: "consent_timestamp_arch".to_string(),
                },
            ]
        );
    }

    #[test]
    fn missing_archival_column_names_the_field() {
        let columns = names(&["record_id", "visit_timestamp"]);
        let error = discover_timestamp_families(&columns, "record_id").unwrap_err();
        assert!(matches!(
            error,
            TransformError::MissingArchivalColumn { ref field, ref expected }
                if field == "visit_timestamp" && expected == "visit_timestamp_arch"
        ));
        assert!(error.is_configuration_error());
    }

    #[test]
    fn unpaired_archival_column_is_rejected() {
        let columns = names(&["record_id", "visit_timestamp_v1_arch"]);
        let error = discover_timestamp_families(&columns, "record_id").unwrap_err();
        assert!(
            matches!(error, TransformError::UnpairedArchivalColumn(ref name) if name == "visit_timestamp_v1_arch")
        );
    }

    #[test]
    fn ordinary_fields_mentioning_timestamp_are_ignored() {
        let columns = names(&["record_id", "timestamp_notes", "visit_timestamp_old"]);
        assert!(discover_timestamp_families(&columns, "record_id")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn grouped_checkbox_column_is_not_a_timestamp() {
        let columns = names(&[
            "record_id",
            "sample_timestamp",
            "sample_timestamp___1",
            "sample_timestamp___2",
        ]);
        assert!(discover_timestamp_families(&columns, "record_id")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn checkbox_dummies_are_not_timestamps() {
        let columns = names(&["record_id", "timestamp_source___1"]);
        assert!(discover_timestamp_families(&columns, "record_id")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn groups_dummies_in_declaration_order() {
        let columns = names(&["record_id", "race___3", "sex", "race___1", "sym___a"]);
        let families = discover_checkbox_families(&columns);
        assert_eq!(families.len(), 2);
        assert_eq!(families[0].base, "race");
        let codes: Vec<&str> = families[0]
            .options
            .iter()
            .map(|option| option.code.as_str())
            .collect();
        assert_eq!(codes, vec!["3", "1"]);
        assert_eq!(families[0].first_column(), Some("race___3"));
        assert_eq!(families[1].base, "sym");
    }
}
