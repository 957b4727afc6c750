//! Session lifecycle integration tests.
//!
//! Verifies the open/close contract for both reuse policies, including the
//! error paths where cleanup matters most.

use super::{default_config, test_profile, work_items};
use db2i_bridge::client::{FailPoint, FailingSessionClient, MockSessionClient};
use db2i_bridge::execute_run;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn fresh_session_per_item_opens_and_closes_n_times() {
    let client = MockSessionClient::new();
    execute_run(&client, &test_profile(), &default_config(), &work_items(4), false)
        .await
        .unwrap();

    let calls = client.calls();
    assert_eq!(calls.sessions_opened, 4);
    assert_eq!(calls.sessions_closed, 4);
}

#[tokio::test]
async fn shared_session_opens_once_closes_once() {
    let client = MockSessionClient::new();
    let mut config = default_config();
    config.options.reuse_connection = true;

    execute_run(&client, &test_profile(), &config, &work_items(4), false)
        .await
        .unwrap();

    let calls = client.calls();
    assert_eq!(calls.sessions_opened, 1);
    assert_eq!(calls.sessions_closed, 1);
}

#[tokio::test]
async fn per_item_session_closed_when_statement_fails() {
    let client = FailingSessionClient::new(FailPoint::Execute);
    execute_run(&client, &test_profile(), &default_config(), &work_items(2), true)
        .await
        .unwrap();

    let calls = client.calls();
    assert_eq!(calls.sessions_opened, 2);
    assert_eq!(calls.sessions_closed, 2);
}

#[tokio::test]
async fn in_flight_session_closed_before_error_propagates() {
    let client = FailingSessionClient::new(FailPoint::Submit);
    let result =
        execute_run(&client, &test_profile(), &default_config(), &work_items(3), false).await;
    assert!(result.is_err());

    let calls = client.calls();
    assert_eq!(calls.sessions_opened, 1);
    assert_eq!(calls.sessions_closed, 1);
}

#[tokio::test]
async fn shared_session_closed_when_tolerated_failures_continue() {
    let client = FailingSessionClient::new(FailPoint::Execute);
    let mut config = default_config();
    config.options.reuse_connection = true;

    let out = execute_run(&client, &test_profile(), &config, &work_items(3), true)
        .await
        .unwrap();
    assert_eq!(out.len(), 3);

    let calls = client.calls();
    assert_eq!(calls.sessions_opened, 1);
    assert_eq!(calls.sessions_closed, 1);
}
