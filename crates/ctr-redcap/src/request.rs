//! Parameters of the REDCap export calls.

use chrono::NaiveDateTime;

/// Time format REDCap expects for `beginTime`/`endTime`.
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Form parameters of an API call, in send order.
pub type FormParams = Vec<(String, String)>;

/// Filters of a flat record export.
///
/// Records are always exported as raw codes; labels are applied afterwards
/// from the data dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordExportRequest {
    pub fields: Vec<String>,
    pub forms: Vec<String>,
    pub events: Vec<String>,
    /// REDCap filter logic, e.g. `[age] > 30`.
    pub filter_logic: Option<String>,
    /// Include survey identifier and survey timestamp fields.
    pub export_survey_fields: bool,
}

impl RecordExportRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn forms<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.forms = forms.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = events.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn filter_logic(mut self, logic: impl Into<String>) -> Self {
        self.filter_logic = Some(logic.into());
        self
    }

    #[must_use]
    pub fn export_survey_fields(mut self, include: bool) -> Self {
        self.export_survey_fields = include;
        self
    }

    pub(crate) fn form_params(&self) -> FormParams {
        let mut params = vec![
            param("format", "csv"),
            param("type", "flat"),
            param("rawOrLabel", "raw"),
            param("rawOrLabelHeaders", "raw"),
            param("exportCheckboxLabel", "false"),
            param("exportSurveyFields", bool_flag(self.export_survey_fields)),
        ];
        push_list(&mut params, "fields", &self.fields);
        push_list(&mut params, "forms", &self.forms);
        push_list(&mut params, "events", &self.events);
        if let Some(logic) = self.filter_logic.as_deref().filter(|logic| !logic.trim().is_empty()) {
            params.push(param("filterLogic", logic));
        }
        params
    }
}

/// Category of a project logging event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    Export,
    Manage,
    User,
    Record,
    RecordAdd,
    RecordEdit,
    RecordDelete,
    LockRecord,
    PageView,
}

impl LogType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Manage => "manage",
            Self::User => "user",
            Self::Record => "record",
            Self::RecordAdd => "record_add",
            Self::RecordEdit => "record_edit",
            Self::RecordDelete => "record_delete",
            Self::LockRecord => "lock_record",
            Self::PageView => "page_view",
        }
    }
}

/// Filters of a project logging export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogExportRequest {
    pub log_type: Option<LogType>,
    pub record: Option<String>,
    pub begin: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl LogExportRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn log_type(mut self, log_type: LogType) -> Self {
        self.log_type = Some(log_type);
        self
    }

    #[must_use]
    pub fn record(mut self, record: impl Into<String>) -> Self {
        self.record = Some(record.into());
        self
    }

    /// Restricts the export to events between `begin` and `end` (minute precision).
    #[must_use]
    pub fn between(mut self, begin: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        self.begin = begin;
        self.end = end;
        self
    }

    pub(crate) fn form_params(&self) -> FormParams {
        let mut params = vec![param("format", "json")];
        if let Some(log_type) = self.log_type {
            params.push(param("logtype", log_type.as_str()));
        }
        if let Some(record) = &self.record {
            params.push(param("record", record));
        }
        if let Some(begin) = self.begin {
            params.push(param("beginTime", &begin.format(LOG_TIME_FORMAT).to_string()));
        }
        if let Some(end) = self.end {
            params.push(param("endTime", &end.format(LOG_TIME_FORMAT).to_string()));
        }
        params
    }
}

pub(crate) fn param(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

/// Appends `key[0]=a`, `key[1]=b`, ... as REDCap expects for array parameters.
pub(crate) fn push_list(params: &mut FormParams, key: &str, values: &[String]) {
    for (idx, value) in values.iter().enumerate() {
        params.push((format!("{key}[{idx}]"), value.clone()));
    }
}

fn bool_flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
