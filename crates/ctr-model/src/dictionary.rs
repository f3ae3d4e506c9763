//! REDCap data dictionary (project metadata) types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Notes,
    Radio,
    Dropdown,
    Checkbox,
    YesNo,
    TrueFalse,
    Calc,
    Descriptive,
    Slider,
    File,
    Sql,
    #[serde(other)]
    Other,
}

impl FieldType {
    /// Field types whose raw value is a single choice code.
    pub fn is_categorical(self) -> bool {
        matches!(
            self,
            Self::Radio | Self::Dropdown | Self::YesNo | Self::TrueFalse
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Notes => "notes",
            Self::Radio => "radio",
            Self::Dropdown => "dropdown",
            Self::Checkbox => "checkbox",
            Self::YesNo => "yesno",
            Self::TrueFalse => "truefalse",
            Self::Calc => "calc",
            Self::Descriptive => "descriptive",
            Self::Slider => "slider",
            Self::File => "file",
            Self::Sql => "sql",
            Self::Other => "other",
        }
    }
}

/// One selectable option of a categorical or checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub code: String,
    pub label: String,
}

/// A single row of the REDCap metadata export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub field_name: String,
    #[serde(default)]
    pub form_name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub field_label: String,
    /// Raw choice definition, e.g. `1, Yes | 0, No`.
    #[serde(default)]
    pub select_choices_or_calculations: String,
}

impl FieldMetadata {
    /// Ordered choices of the field.
    ///
    /// `yesno` and `truefalse` fields have implicit choices that REDCap does
    /// not include in the metadata export.
    pub fn choices(&self) -> Vec<Choice> {
        match self.field_type {
            FieldType::YesNo => implicit_choices(&[("1", "Yes"), ("0", "No")]),
            FieldType::TrueFalse => implicit_choices(&[("1", "True"), ("0", "False")]),
            FieldType::Radio | FieldType::Dropdown | FieldType::Checkbox => {
                parse_choices(&self.select_choices_or_calculations)
            }
            _ => Vec::new(),
        }
    }

    /// Label of a raw code, if the code is one of the field's choices.
    ///
    /// Codes are compared case-insensitively because REDCap lowercases
    /// checkbox codes in exported column names.
    pub fn label_for(&self, code: &str) -> Option<String> {
        let code = code.trim();
        self.choices()
            .into_iter()
            .find(|choice| choice.code.eq_ignore_ascii_case(code))
            .map(|choice| choice.label)
    }
}

fn implicit_choices(pairs: &[(&str, &str)]) -> Vec<Choice> {
    pairs
        .iter()
        .map(|(code, label)| Choice {
            code: (*code).to_string(),
            label: (*label).to_string(),
        })
        .collect()
}

/// Parses a REDCap choice definition (`code, label | code, label`).
///
/// Only the first comma of each entry separates code from label, so labels
/// may contain commas. Entries without a comma are skipped.
pub fn parse_choices(raw: &str) -> Vec<Choice> {
    raw.split('|')
        .filter_map(|entry| {
            let (code, label) = entry.split_once(',')?;
            let code = code.trim();
            if code.is_empty() {
                return None;
            }
            Some(Choice {
                code: code.to_string(),
                label: label.trim().to_string(),
            })
        })
        .collect()
}

/// The full data dictionary of a project, in export order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataDictionary {
    pub fields: Vec<FieldMetadata>,
}

impl DataDictionary {
    pub fn new(fields: Vec<FieldMetadata>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|field| field.field_name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Distinct form names in first-seen order.
    pub fn forms(&self) -> Vec<&str> {
        let mut forms: Vec<&str> = Vec::new();
        for field in &self.fields {
            if !field.form_name.is_empty() && !forms.contains(&field.form_name.as_str()) {
                forms.push(field.form_name.as_str());
            }
        }
        forms
    }
}
