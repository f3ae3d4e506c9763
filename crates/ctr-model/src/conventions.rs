//! REDCap flat-export naming conventions.
//!
//! REDCap encodes field structure in column names rather than in a schema,
//! so every column-discovery routine in the workspace matches against the
//! constants defined here.

use std::sync::LazyLock;

use regex::Regex;

/// Default record identifier column of a REDCap project.
pub const DEFAULT_ROW_ID_COLUMN: &str = "record_id";

/// Columns that, together with the record id, identify a row of a
/// longitudinal or repeating-instrument export.
pub const EVENT_KEY_COLUMNS: [&str; 3] = [
    "redcap_event_name",
    "redcap_repeat_instrument",
    "redcap_repeat_instance",
];

/// Substring marking a timestamp column (primary or archival).
pub const TIMESTAMP_MARKER: &str = "timestamp";

/// Suffix appended to a primary timestamp field to name its archival copy.
pub const ARCHIVAL_SUFFIX: &str = "_arch";

/// Separator between a checkbox base field and its option code.
pub const CHECKBOX_SEPARATOR: &str = "___";

/// Indicator value of a selected checkbox option.
pub const SELECTED_INDICATOR: &str = "1";

/// Derived column holding the most recent known timestamp of a record.
pub const DATE_SURVEY_COLUMN: &str = "date_survey";

/// Text format of REDCap survey timestamps (`chrono` syntax).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text REDCap exports in survey timestamp fields of unfinished surveys.
pub const NOT_COMPLETED_MARKER: &str = "[not completed]";

/// Pattern of a checkbox dummy column: `<base>___<code>`.
pub const CHECKBOX_COLUMN_PATTERN: &str = r"^(?P<base>.+?)___(?P<code>.+)$";

static CHECKBOX_COLUMN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(CHECKBOX_COLUMN_PATTERN).expect("checkbox column pattern is valid")
});

/// Returns true if the column is a primary timestamp field.
pub fn is_primary_timestamp(name: &str) -> bool {
    name.ends_with(TIMESTAMP_MARKER)
}

/// Returns true if the column is shaped like the archival copy of a timestamp field.
///
/// Other names that merely contain the marker, such as `timestamp_notes`, are
/// ordinary fields.
pub fn is_archival_timestamp(name: &str) -> bool {
    name.strip_suffix(ARCHIVAL_SUFFIX)
        .is_some_and(|stem| stem.contains(TIMESTAMP_MARKER))
}

/// Name of the archival column paired with a primary timestamp field.
pub fn archival_name(primary: &str) -> String {
    format!("{primary}{ARCHIVAL_SUFFIX}")
}

/// Splits a checkbox dummy column name into `(base, code)`.
///
/// The split happens at the first separator so option codes may themselves
/// contain underscores. Names with an empty base or code are not dummies.
pub fn split_checkbox_column(name: &str) -> Option<(&str, &str)> {
    let captures = CHECKBOX_COLUMN_RE.captures(name)?;
    let base = captures.name("base")?.as_str();
    let code = captures.name("code")?.as_str();
    Some((base, code))
}

/// Name of the dummy column for a checkbox option.
pub fn checkbox_column(base: &str, code: &str) -> String {
    format!("{base}{CHECKBOX_SEPARATOR}{code}")
}
