use std::time::{Duration, SystemTime, UNIX_EPOCH};

use httpmock::Method::GET;
use httpmock::MockServer;
use serde_json::json;
use time::macros::datetime;
use tnexport::cli::commands::sheets::{CalculatorSheetsArgs, export_sheets};
use tnexport::config::SmartsheetConfig;
use tnexport::models::Scalar;
use tnexport::sink::RunStamp;
use tnexport::sources::{SheetSource, SmartsheetClient, SourceError};

fn client_for(server: &MockServer) -> SmartsheetClient {
    let config = SmartsheetConfig::from_lookup(|name| match name {
        "SMARTSHEET_API_KEY" => Some("test-token".to_string()),
        "SMARTSHEET_API_URL" => Some(server.base_url()),
        _ => None,
    })
    .expect("config should build")
    .with_timeout(Duration::from_secs(5));
    SmartsheetClient::new(&config).expect("client should build")
}

fn land_use_payload() -> serde_json::Value {
    json!({
        "id": 3365837005082500_u64,
        "name": "TN Calculator Land Use",
        "columns": [
            {"id": 5001, "index": 0, "title": "Land Use"},
            {"id": 5002, "index": 1, "title": "Base Load (TN)"}
        ],
        "rows": [
            {"id": 1, "cells": [{"columnId": 5001, "value": "Commercial"}, {"columnId": 5002, "value": 12.5}]},
            {"id": 2, "cells": [{"columnId": 5001, "value": "Residential"}, {"columnId": 5002}]}
        ]
    })
}

#[test]
fn fetch_sends_bearer_token_and_decodes_sheet() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/sheets/3365837005082500")
            .header("Authorization", "Bearer test-token");
        then.status(200).json_body(land_use_payload());
    });

    let sheet = client_for(&server)
        .fetch_sheet("3365837005082500")
        .expect("sheet should fetch");

    mock.assert();
    assert_eq!(sheet.columns.len(), 2);
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[0].cells[1].value, Scalar::Float(12.5));
    assert_eq!(sheet.rows[1].cells[1].value, Scalar::Null);
}

#[test]
fn non_success_status_is_an_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/sheets/404404");
        then.status(404)
            .body(r#"{"errorCode":1006,"message":"Not Found"}"#);
    });

    let error = client_for(&server)
        .fetch_sheet("404404")
        .expect_err("404 must fail");

    match error {
        SourceError::Api { status, body, .. } => {
            assert_eq!(status, 404);
            assert!(body.contains("Not Found"), "unexpected body: {body}");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[test]
fn malformed_body_is_a_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/sheets/1");
        then.status(200).body("<html>maintenance</html>");
    });

    let error = client_for(&server)
        .fetch_sheet("1")
        .expect_err("html body must fail");

    assert!(matches!(error, SourceError::Decode { .. }), "got {error:?}");
}

#[test]
fn failed_sheet_is_skipped_and_sibling_still_exports() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/sheets/3365837005082500");
        then.status(200).json_body(land_use_payload());
    });
    server.mock(|when, then| {
        when.method(GET).path("/sheets/7586918783995780");
        then.status(500).body("upstream unavailable");
    });

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_nanos();
    let out_dir = std::env::temp_dir().join(format!("tnexport-sheets-{nanos}"));
    let args = CalculatorSheetsArgs {
        land_use_sheet: "3365837005082500".to_string(),
        treatment_sheet: "7586918783995780".to_string(),
        land_use_output: "tn_calculator_land_use.json".to_string(),
        treatment_output: "tn_calculator_treatment_methods.json".to_string(),
        timeout_secs: 5,
    };
    let stamp = RunStamp::at(datetime!(2025-01-01 00:00:00 UTC)).expect("stamp should format");

    let written = export_sheets(&client_for(&server), &args.exports(), &out_dir, &stamp)
        .expect("export should succeed");

    assert_eq!(written, vec![out_dir.join("tn_calculator_land_use.json")]);
    let exported: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(&written[0]).expect("export should be readable"),
    )
    .expect("export should be json");
    assert_eq!(exported, json!([{"name": "Commercial", "base_load": 12.5}]));
    assert!(!out_dir.join("tn_calculator_treatment_methods.json").exists());
}
