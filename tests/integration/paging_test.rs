//! Result-paging integration tests.
//!
//! Verifies the fetch-until-done loop and its interaction with page scripts
//! of different shapes.

use super::{default_config, paged_script, test_profile, work_items};
use db2i_bridge::client::{MockSessionClient, ResultPage};
use db2i_bridge::{execute_run, OutputRecord};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn accumulates_rows_across_pages() {
    let client = MockSessionClient::with_pages(paged_script());
    let out = execute_run(&client, &test_profile(), &default_config(), &work_items(1), false)
        .await
        .unwrap();

    assert_eq!(out.len(), 1);
    match &out[0] {
        OutputRecord::SqlAggregate { rows, .. } => {
            let order_numbers: Vec<_> = rows.iter().map(|r| r["ORDNO"].clone()).collect();
            assert_eq!(order_numbers, vec![json!(1), json!(2), json!(3), json!(4)]);
        }
        other => panic!("expected SqlAggregate, got {other:?}"),
    }
}

#[tokio::test]
async fn stops_immediately_on_terminal_first_page() {
    let client = MockSessionClient::with_pages(vec![ResultPage {
        rows: vec![json!({"A": 1})],
        is_done: true,
        ..Default::default()
    }]);

    execute_run(&client, &test_profile(), &default_config(), &work_items(1), false)
        .await
        .unwrap();

    let calls = client.calls();
    assert_eq!(calls.execute_calls, 1);
    assert_eq!(calls.fetch_calls, 0);
}

#[tokio::test]
async fn fetch_count_matches_non_terminal_pages() {
    let client = MockSessionClient::with_pages(paged_script());
    execute_run(&client, &test_profile(), &default_config(), &work_items(1), false)
        .await
        .unwrap();

    // First page via execute, two more via fetch.
    let calls = client.calls();
    assert_eq!(calls.execute_calls, 1);
    assert_eq!(calls.fetch_calls, 2);
}

#[tokio::test]
async fn empty_terminal_result_set() {
    let client = MockSessionClient::with_pages(vec![ResultPage::empty()]);
    let out = execute_run(&client, &test_profile(), &default_config(), &work_items(1), false)
        .await
        .unwrap();

    match &out[0] {
        OutputRecord::SqlAggregate { rows, .. } => assert!(rows.is_empty()),
        other => panic!("expected SqlAggregate, got {other:?}"),
    }
}

#[tokio::test]
async fn paging_repeats_per_item() {
    let client = MockSessionClient::with_pages(paged_script());
    let out = execute_run(&client, &test_profile(), &default_config(), &work_items(3), false)
        .await
        .unwrap();

    assert_eq!(out.len(), 3);
    let calls = client.calls();
    assert_eq!(calls.queries_submitted, 3);
    assert_eq!(calls.execute_calls, 3);
    assert_eq!(calls.fetch_calls, 6);
}
