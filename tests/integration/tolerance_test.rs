//! Failure-tolerance integration tests.
//!
//! Verifies the per-item error boundary: tolerant runs emit exactly one
//! error record per failing item and never abort early, intolerant runs
//! abort at the first failure.

use super::{default_config, test_profile, work_items};
use db2i_bridge::client::{ClientError, FailPoint, FailingSessionClient, MockSessionClient};
use db2i_bridge::{execute_run, OutputRecord};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn tolerant_run_emits_one_error_record_per_item() {
    let client = FailingSessionClient::new(FailPoint::Execute);
    let out = execute_run(&client, &test_profile(), &default_config(), &work_items(3), true)
        .await
        .unwrap();

    assert_eq!(out.len(), 3);
    assert!(out
        .iter()
        .all(|r| matches!(r, OutputRecord::Failure { .. })));
}

#[tokio::test]
async fn intolerant_run_aborts_at_first_failure() {
    let client = FailingSessionClient::new(FailPoint::Execute);
    let err = execute_run(&client, &test_profile(), &default_config(), &work_items(3), false)
        .await
        .unwrap_err();

    assert_eq!(err.category(), "Statement Error");
    // Remaining items never started.
    assert_eq!(client.calls().sessions_opened, 1);
}

#[tokio::test]
async fn normalized_error_carries_daemon_fields() {
    let client = FailingSessionClient::with_error(
        FailPoint::Execute,
        ClientError {
            message: "Token was not valid".to_string(),
            name: Some("SqlSyntaxError".to_string()),
            code: Some("-104".to_string()),
            sql_state: Some("42601".to_string()),
            stack: Some("at QZDASOINIT".to_string()),
        },
    );

    let out = execute_run(&client, &test_profile(), &default_config(), &work_items(1), true)
        .await
        .unwrap();

    match &out[0] {
        OutputRecord::Failure { error } => {
            assert_eq!(error.message, "Token was not valid");
            assert_eq!(error.name.as_deref(), Some("SqlSyntaxError"));
            assert_eq!(error.code.as_deref(), Some("-104"));
            assert_eq!(error.sql_state.as_deref(), Some("42601"));
            assert_eq!(error.stack.as_deref(), Some("at QZDASOINIT"));
        }
        other => panic!("expected Failure, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_parameters_marker_is_identifiable() {
    let client = MockSessionClient::new();
    let mut config = default_config();
    config.options.use_parameters = true;
    config.options.parameters_json = Some("not-json".to_string());

    let out = execute_run(&client, &test_profile(), &config, &work_items(1), true)
        .await
        .unwrap();

    match &out[0] {
        OutputRecord::Failure { error } => {
            assert!(error.message.contains("Invalid parameters JSON"));
        }
        other => panic!("expected Failure, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_parameters_fail_intolerant_run_without_output() {
    let client = MockSessionClient::new();
    let mut config = default_config();
    config.options.use_parameters = true;
    config.options.parameters_json = Some("\"scalar\"".to_string());

    let result = execute_run(&client, &test_profile(), &config, &work_items(1), false).await;
    assert!(result.is_err());
    assert_eq!(client.calls().queries_submitted, 0);
}

#[tokio::test]
async fn tolerated_failure_serializes_with_error_envelope() {
    let client = FailingSessionClient::new(FailPoint::Execute);
    let out = execute_run(&client, &test_profile(), &default_config(), &work_items(1), true)
        .await
        .unwrap();

    let value = serde_json::to_value(&out[0]).unwrap();
    let error = value.get("error").expect("error envelope");
    assert!(error.get("message").is_some());
    assert_eq!(error["sqlState"], serde_json::json!("42601"));
}
