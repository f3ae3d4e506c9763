//! Tests for ctr-model types.

use ctr_model::{ConfigError, DataDictionary, FieldType, RedcapConfig};

const METADATA_JSON: &str = r#"[
    {
        "field_name": "record_id",
        "form_name": "enrolment",
        "section_header": "",
        "field_type": "text",
        "field_label": "Record ID",
        "select_choices_or_calculations": "",
        "field_note": ""
    },
    {
        "field_name": "sex",
        "form_name": "enrolment",
        "field_type": "radio",
        "field_label": "Sex",
        "select_choices_or_calculations": "1, Female | 2, Male"
    },
    {
        "field_name": "symptoms",
        "form_name": "follow_up",
        "field_type": "checkbox",
        "field_label": "Symptoms",
        "select_choices_or_calculations": "1, Fever | 2, Cough | 99, Other"
    },
    {
        "field_name": "bmi",
        "form_name": "follow_up",
        "field_type": "calc",
        "field_label": "BMI",
        "select_choices_or_calculations": "[weight]/([height]^2)"
    },
    {
        "field_name": "signature",
        "form_name": "follow_up",
        "field_type": "signature_pad"
    }
]"#;

#[test]
fn dictionary_deserializes_metadata_export() {
    let dictionary: DataDictionary = serde_json::from_str(METADATA_JSON).expect("parse metadata");
    assert_eq!(dictionary.len(), 5);
    assert_eq!(dictionary.forms(), vec!["enrolment", "follow_up"]);

    let sex = dictionary.field("sex").expect("sex field");
    assert_eq!(sex.field_type, FieldType::Radio);
    assert!(sex.field_type.is_categorical());
    assert_eq!(sex.label_for("2").as_deref(), Some("Male"));

    let symptoms = dictionary.field("symptoms").expect("symptoms field");
    assert_eq!(symptoms.choices().len(), 3);
    assert!(!symptoms.field_type.is_categorical());

    let bmi = dictionary.field("bmi").expect("bmi field");
    assert!(bmi.choices().is_empty());

    let signature = dictionary.field("signature").expect("signature field");
    assert_eq!(signature.field_type, FieldType::Other);
    assert_eq!(signature.form_name, "follow_up");
}

#[test]
fn config_from_toml_applies_default_timeout() {
    let config = RedcapConfig::from_toml_str(
        "api_url = \" https://redcap.example.org/api/ \"\ntoken = \"ABC123\"\n",
    )
    .expect("parse config");
    assert_eq!(config.api_url, "https://redcap.example.org/api/");
    assert_eq!(config.token, "ABC123");
    assert_eq!(config.timeout_secs, ctr_model::config::DEFAULT_TIMEOUT_SECS);
}

#[test]
fn config_rejects_invalid_values() {
    assert!(matches!(
        RedcapConfig::new("ftp://redcap.example.org", "ABC"),
        Err(ConfigError::InvalidUrl(_))
    ));
    assert!(matches!(
        RedcapConfig::new("https://redcap.example.org/api/", "  "),
        Err(ConfigError::EmptyToken)
    ));
    assert!(matches!(
        RedcapConfig::from_toml_str("api_url = \"https://x\"\ntoken = \"t\"\ntimeout_secs = 0\n"),
        Err(ConfigError::InvalidTimeout)
    ));
    assert!(matches!(
        RedcapConfig::from_toml_str("api_url = 3"),
        Err(ConfigError::Parse(_))
    ));
}
