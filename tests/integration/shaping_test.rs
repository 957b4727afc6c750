//! Output-shaping integration tests.
//!
//! Verifies the stable output shapes across modes, metadata toggles, and
//! their JSON serialization as seen by the caller.

use super::{default_config, paged_script, test_profile, work_items};
use db2i_bridge::client::{CommandOutcome, MockSessionClient};
use db2i_bridge::{execute_run, ExecutionMode, OutputMode, OutputRecord, RunConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn aggregate_record_carries_metadata_and_update_count() {
    let client = MockSessionClient::with_pages(paged_script());
    let out = execute_run(&client, &test_profile(), &default_config(), &work_items(1), false)
        .await
        .unwrap();

    let value = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(value["metadata"], json!([{"name": "ORDNO", "type": "NUMERIC"}]));
    assert_eq!(value["updateCount"], json!(-1));
    assert_eq!(value["rows"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn metadata_omitted_when_disabled() {
    let client = MockSessionClient::with_pages(paged_script());
    let mut config = default_config();
    config.options.include_metadata = false;

    let out = execute_run(&client, &test_profile(), &config, &work_items(1), false)
        .await
        .unwrap();

    let value = serde_json::to_value(&out[0]).unwrap();
    assert!(value.get("metadata").is_none());
    assert!(value.get("updateCount").is_none());
}

#[tokio::test]
async fn per_row_records_repeat_result_set_metadata() {
    let client = MockSessionClient::with_pages(paged_script());
    let mut config = default_config();
    config.options.output_mode = OutputMode::PerRow;

    let out = execute_run(&client, &test_profile(), &config, &work_items(1), false)
        .await
        .unwrap();

    assert_eq!(out.len(), 4);
    for record in &out {
        let value = serde_json::to_value(record).unwrap();
        assert!(value.get("row").is_some());
        assert_eq!(value["metadata"], json!([{"name": "ORDNO", "type": "NUMERIC"}]));
    }
}

#[tokio::test]
async fn per_row_without_metadata_is_row_only() {
    let client = MockSessionClient::with_pages(paged_script());
    let mut config = default_config();
    config.options.output_mode = OutputMode::PerRow;
    config.options.include_metadata = false;

    let out = execute_run(&client, &test_profile(), &config, &work_items(1), false)
        .await
        .unwrap();

    let value = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(value, json!({"row": {"ORDNO": 1}}));
}

#[tokio::test]
async fn cl_outcome_maps_to_success_data_message() {
    let client = MockSessionClient::new().with_command_outcome(CommandOutcome {
        success: true,
        data: json!("OK"),
        error: None,
    });
    let config = RunConfig {
        mode: ExecutionMode::Cl,
        statement: "WRKACTJOB".to_string(),
        ..Default::default()
    };

    let out = execute_run(&client, &test_profile(), &config, &work_items(1), false)
        .await
        .unwrap();

    let value = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(value, json!({"success": true, "data": "OK", "message": null}));
}

#[tokio::test]
async fn cl_failure_outcome_keeps_error_text() {
    let client = MockSessionClient::new().with_command_outcome(CommandOutcome {
        success: false,
        data: json!(null),
        error: Some("CPF1234: Library not found".to_string()),
    });
    let config = RunConfig {
        mode: ExecutionMode::Cl,
        statement: "DSPLIB BADLIB".to_string(),
        ..Default::default()
    };

    let out = execute_run(&client, &test_profile(), &config, &work_items(1), false)
        .await
        .unwrap();

    match &out[0] {
        OutputRecord::Command {
            success, message, ..
        } => {
            assert!(!success);
            assert_eq!(message.as_deref(), Some("CPF1234: Library not found"));
        }
        other => panic!("expected Command, got {other:?}"),
    }
}

#[tokio::test]
async fn run_output_round_trips_through_json() {
    let client = MockSessionClient::with_pages(paged_script());
    let out = execute_run(&client, &test_profile(), &default_config(), &work_items(2), false)
        .await
        .unwrap();

    let text = serde_json::to_string(&out).unwrap();
    let parsed: Vec<OutputRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, out);
}
