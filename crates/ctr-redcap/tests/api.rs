//! API client behaviour against an in-memory transport.

use std::cell::RefCell;
use std::collections::VecDeque;

use ctr_common::{column_names, column_strings};
use ctr_model::{ConfigError, FieldType, RedcapConfig};
use ctr_redcap::{
    HttpReply, LogExportRequest, LogType, RecordExportRequest, RedcapClient, RedcapError,
    Transport,
};

/// Replays canned replies and records every request.
#[derive(Default)]
struct FakeTransport {
    replies: RefCell<VecDeque<HttpReply>>,
    requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeTransport {
    fn replying(status: u16, body: &str) -> Self {
        let transport = Self::default();
        transport.replies.borrow_mut().push_back(HttpReply {
            status,
            body: body.to_string(),
        });
        transport
    }

    fn last_form(&self) -> Vec<(String, String)> {
        self.requests
            .borrow()
            .last()
            .map(|(_, form)| form.clone())
            .expect("a request was sent")
    }
}

impl Transport for FakeTransport {
    fn post_form(&self, url: &str, form: &[(String, String)]) -> ctr_redcap::Result<HttpReply> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), form.to_vec()));
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| RedcapError::Http("no reply queued".to_string()))
    }
}

fn config() -> RedcapConfig {
    RedcapConfig::new("https://redcap.example.org/api/", "0123456789ABCDEF").expect("config")
}

fn value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

#[test]
fn record_export_parses_csv_payload() {
    let transport = FakeTransport::replying(
        200,
        "record_id,race___1,race___2,visit_timestamp,visit_timestamp_arch\n1,1,0,2024-01-05 10:00:00,\n",
    );
    let client = RedcapClient::with_transport(config(), transport).expect("client");

    let request = RecordExportRequest::new().events(["baseline_arm_1"]);
    let frame = client.export_records(&request).expect("records");

    assert_eq!(
        column_names(&frame),
        vec![
            "record_id",
            "race___1",
            "race___2",
            "visit_timestamp",
            "visit_timestamp_arch"
        ]
    );
    assert_eq!(
        column_strings(&frame, "visit_timestamp_arch"),
        Some(vec![String::new()])
    );
    let form = client_form(&client);
    assert_eq!(value(&form, "events[0]"), Some("baseline_arm_1"));
    assert_eq!(value(&form, "exportSurveyFields"), Some("false"));
}

#[test]
fn record_export_form_fields() {
    let transport = FakeTransport::replying(200, "record_id\n1\n");
    let client = RedcapClient::with_transport(config(), transport).expect("client");
    let request = RecordExportRequest::new()
        .forms(["enrolment", "visit"])
        .filter_logic("[age] >= 18")
        .export_survey_fields(true);
    client.export_records(&request).expect("records");

    let form = client_form(&client);
    assert_eq!(value(&form, "token"), Some("0123456789ABCDEF"));
    assert_eq!(value(&form, "content"), Some("record"));
    assert_eq!(value(&form, "format"), Some("csv"));
    assert_eq!(value(&form, "type"), Some("flat"));
    assert_eq!(value(&form, "rawOrLabel"), Some("raw"));
    assert_eq!(value(&form, "exportSurveyFields"), Some("true"));
    assert_eq!(value(&form, "exportCheckboxLabel"), Some("false"));
    assert_eq!(value(&form, "forms[0]"), Some("enrolment"));
    assert_eq!(value(&form, "forms[1]"), Some("visit"));
    assert_eq!(value(&form, "filterLogic"), Some("[age] >= 18"));
}

#[test]
fn metadata_export_decodes_dictionary() {
    let transport = FakeTransport::replying(
        200,
        r#"[{"field_name":"record_id","form_name":"enrolment","field_type":"text","field_label":"Record ID","select_choices_or_calculations":""},
            {"field_name":"race","form_name":"enrolment","field_type":"checkbox","field_label":"Race","select_choices_or_calculations":"1, White | 2, Black"}]"#,
    );
    let client = RedcapClient::with_transport(config(), transport).expect("client");

    let dictionary = client
        .export_metadata(&["enrolment".to_string()])
        .expect("metadata");

    assert_eq!(dictionary.len(), 2);
    let race = dictionary.field("race").expect("race field");
    assert_eq!(race.field_type, FieldType::Checkbox);
    assert_eq!(race.label_for("2").as_deref(), Some("Black"));

    let form = client_form(&client);
    assert_eq!(value(&form, "content"), Some("metadata"));
    assert_eq!(value(&form, "format"), Some("json"));
    assert_eq!(value(&form, "forms[0]"), Some("enrolment"));
}

#[test]
fn logging_export_decodes_entries() {
    let transport = FakeTransport::replying(
        200,
        r#"[{"timestamp":"2024-01-05 10:05","username":"site_a","action":"Update record 7","details":"age = '31'","record":"7"}]"#,
    );
    let client = RedcapClient::with_transport(config(), transport).expect("client");

    let entries = client
        .export_logging(&LogExportRequest::new().log_type(LogType::Record).record("7"))
        .expect("log");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].username, "site_a");

    let form = client_form(&client);
    assert_eq!(value(&form, "content"), Some("log"));
    assert_eq!(value(&form, "logtype"), Some("record"));
    assert_eq!(value(&form, "record"), Some("7"));
}

#[test]
fn api_errors_carry_redcap_message() {
    let transport = FakeTransport::replying(403, r#"{"error":"You do not have permissions to use the API"}"#);
    let client = RedcapClient::with_transport(config(), transport).expect("client");

    let error = client.export_version().unwrap_err();
    assert!(matches!(
        error,
        RedcapError::Api { status: 403, ref message }
            if message == "You do not have permissions to use the API"
    ));
    assert!(!error.is_retryable());
}

#[test]
fn malformed_metadata_is_a_decode_error() {
    let transport = FakeTransport::replying(200, "<html>maintenance</html>");
    let client = RedcapClient::with_transport(config(), transport).expect("client");
    let error = client.export_metadata(&[]).unwrap_err();
    assert!(matches!(error, RedcapError::Decode { content: "metadata", .. }));
}

#[test]
fn version_is_trimmed() {
    let transport = FakeTransport::replying(200, "14.0.2\n");
    let client = RedcapClient::with_transport(config(), transport).expect("client");
    assert_eq!(client.export_version().expect("version"), "14.0.2");
}

#[test]
fn custom_transport_still_validates_config() {
    let mut blank_token = config();
    blank_token.token = String::new();
    let result = RedcapClient::with_transport(blank_token, FakeTransport::default());
    assert!(matches!(
        result,
        Err(RedcapError::Config(ConfigError::EmptyToken))
    ));

    let mut ftp = config();
    ftp.api_url = "ftp://redcap.example.org/api/".to_string();
    let transport = FakeTransport::default();
    let result = RedcapClient::with_transport(ftp, transport);
    assert!(matches!(
        result,
        Err(RedcapError::Config(ConfigError::InvalidUrl(_)))
    ));
}

fn client_form(client: &RedcapClient<FakeTransport>) -> Vec<(String, String)> {
    client.transport().last_form()
}
