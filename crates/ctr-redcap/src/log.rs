//! Entries of the project logging export.

use serde::{Deserialize, Serialize};

/// One row of the REDCap project log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Server-local time, `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub details: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub record: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_record_is_none() {
        let entries: Vec<LogEntry> = serde_json::from_str(
            r#"[{"timestamp":"2024-01-05 10:00","username":"alice","action":"Manage/Design","details":"Create project","record":""},
                {"timestamp":"2024-01-05 10:05","username":"bob","action":"Update record 7","details":"age = '31'","record":"7"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].record, None);
        assert_eq!(entries[1].record.as_deref(), Some("7"));
    }
}
