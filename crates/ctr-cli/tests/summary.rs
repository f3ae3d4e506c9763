//! Rendering of the data dictionary listing.

use ctr_cli::summary::{dictionary_plain, dictionary_table};
use ctr_model::DataDictionary;

fn dictionary() -> DataDictionary {
    serde_json::from_str(
        r#"[
            {"field_name": "record_id", "form_name": "enrolment", "field_type": "text",
             "field_label": "Record ID", "select_choices_or_calculations": ""},
            {"field_name": "sex", "form_name": "enrolment", "field_type": "dropdown",
             "field_label": "Sex at\nbirth", "select_choices_or_calculations": "1, Male | 2, Female"},
            {"field_name": "symptoms", "form_name": "follow_up", "field_type": "checkbox",
             "field_label": "Symptoms", "select_choices_or_calculations": "1, Fever | 2, Cough, dry"},
            {"field_name": "consent", "form_name": "enrolment", "field_type": "yesno",
             "field_label": "Consent given", "select_choices_or_calculations": ""}
        ]"#,
    )
    .expect("dictionary json")
}

#[test]
fn test_dictionary_plain_listing() {
    let rendered = dictionary_plain(&dictionary()).replace('\t', " | ");
    insta::assert_snapshot!(rendered.trim_end(), @r"
    field | form | type | label | choices
    record_id | enrolment | text | Record ID | -
    sex | enrolment | dropdown | Sex at birth | 1=Male; 2=Female
    symptoms | follow_up | checkbox | Symptoms | 1=Fever; 2=Cough, dry
    consent | enrolment | yesno | Consent given | 1=Yes; 0=No
    ");
}

#[test]
fn test_dictionary_table_lists_every_field() {
    let table = dictionary_table(&dictionary()).to_string();
    for field in ["record_id", "sex", "symptoms", "consent"] {
        assert!(table.contains(field), "missing {field}");
    }
    assert!(table.contains("1=Fever"));
}
