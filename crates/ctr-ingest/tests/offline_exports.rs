//! Tests for loading and writing offline exports.

use std::fs;

use ctr_common::{column_names, column_strings, datetime_column};
use ctr_ingest::{
    IngestError, expand_inputs, list_csv_files, merge_exports, read_export_csv, write_frame_csv,
};
use polars::prelude::DataFrame;

#[test]
fn lists_csv_files_sorted_and_skips_others() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("b_follow_up.CSV"), "record_id\n1\n").expect("write");
    fs::write(dir.path().join("a_enrolment.csv"), "record_id\n1\n").expect("write");
    fs::write(dir.path().join("notes.txt"), "ignore me").expect("write");
    fs::create_dir(dir.path().join("nested.csv")).expect("mkdir");

    let files = list_csv_files(dir.path()).expect("list");
    let names: Vec<String> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a_enrolment.csv", "b_follow_up.CSV"]);
}

#[test]
fn missing_directory_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent");
    assert!(matches!(
        list_csv_files(&missing),
        Err(IngestError::DirectoryNotFound { .. })
    ));
}

#[test]
fn folder_of_exports_merges_into_one_table() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("1_enrolment.csv"),
        "record_id,sex,enrolment_timestamp\n101,1,2024-01-05 10:00:00\n102,2,\n",
    )
    .expect("write");
    fs::write(
        dir.path().join("2_follow_up.csv"),
        "record_id,symptoms___1,symptoms___2\n102,1,0\n103,0,1\n",
    )
    .expect("write");

    let files = expand_inputs(&[dir.path().to_path_buf()]).expect("expand");
    let frames: Vec<DataFrame> = files
        .iter()
        .map(|path| read_export_csv(path).expect("read"))
        .collect();
    let merged = merge_exports(&frames, "record_id").expect("merge");

    assert_eq!(
        column_names(&merged),
        vec![
            "record_id",
            "sex",
            "enrolment_timestamp",
            "symptoms___1",
            "symptoms___2"
        ]
    );
    assert_eq!(merged.height(), 3);
    assert_eq!(
        column_strings(&merged, "symptoms___1"),
        Some(vec![String::new(), "1".to_string(), "0".to_string()])
    );
}

#[test]
fn written_csv_formats_timestamps() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("out.csv");
    let df = DataFrame::new(vec![
        ctr_common::string_column("record_id", vec![Some("1".to_string()), Some("2".to_string())]),
        // 2024-01-06 09:00:00 UTC
        datetime_column("date_survey", vec![Some(1_704_531_600_000), None]).expect("column"),
    ])
    .expect("frame");

    write_frame_csv(&df, &path).expect("write");
    let written = fs::read_to_string(&path).expect("read back");
    assert_eq!(written, "record_id,date_survey\n1,2024-01-06 09:00:00\n2,\n");

    let reloaded = read_export_csv(&path).expect("reload");
    assert_eq!(
        column_strings(&reloaded, "date_survey"),
        Some(vec!["2024-01-06 09:00:00".to_string(), String::new()])
    );
}
