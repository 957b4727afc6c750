//! Run orchestration: the query-execution and result-paging engine.
//!
//! For each work item, resolves a session, dispatches the SQL
//! execution-with-paging flow or the CL single-shot flow, shapes the output,
//! and guarantees session cleanup. Failures are caught at the per-item
//! boundary only: tolerant runs turn them into inline error records and keep
//! going, intolerant runs release the in-flight session and propagate.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::{QueryOptions, Session, SessionClient};
use crate::config::{AdditionalOptions, ConnectionProfile, ExecutionMode, OutputMode, RunConfig};
use crate::error::Result;
use crate::output::{
    normalize_error, shape_command, shape_sql_aggregate, shape_sql_per_row, OutputRecord,
};
use crate::run::params::parse_parameters;
use crate::session::SessionBroker;

/// One unit of input work.
///
/// Carries no required fields; every run-level setting is re-resolved against
/// the item index, so the item itself is an opaque payload.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct WorkItem {
    #[serde(default)]
    pub payload: Value,
}

impl WorkItem {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }
}

/// Executes one run: all work items against one connection profile.
///
/// Returns the ordered output records for the whole run. Items are processed
/// strictly one after another; item *n+1* never starts before item *n*'s
/// session, execution, and cleanup have completed.
///
/// With `tolerate_failures`, every item yields exactly one output record even
/// on failure (the normalized error shape). Without it, the first failing
/// item aborts the run; the in-flight session is still released, and closing
/// a shared session is attempted best-effort before the error surfaces.
pub async fn execute_run(
    client: &dyn SessionClient,
    profile: &ConnectionProfile,
    config: &RunConfig,
    items: &[WorkItem],
    tolerate_failures: bool,
) -> Result<Vec<OutputRecord>> {
    config.validate()?;

    let params = profile.connect_params();
    // Run-level decision, read once before the loop.
    let reuse = config.options.reuse_connection;
    let mut broker = SessionBroker::new(client, &params, reuse);

    info!(
        mode = config.mode.as_str(),
        items = items.len(),
        reuse_connection = reuse,
        target = %profile.display_string(),
        "starting run"
    );

    let mut output = Vec::new();

    for index in 0..items.len() {
        debug!(item = index, "processing work item");

        let outcome = run_one_item(client, config, &mut broker).await;

        match outcome {
            Ok(records) => output.extend(records),
            Err(e) if tolerate_failures => {
                warn!(item = index, error = %e, "item failed, continuing");
                output.push(OutputRecord::Failure {
                    error: normalize_error(&e),
                });
            }
            Err(e) => {
                broker.finish_best_effort().await;
                return Err(e);
            }
        }
    }

    broker.finish().await?;

    info!(records = output.len(), "run complete");
    Ok(output)
}

/// Runs one work item inside the per-item error boundary.
///
/// Acquires the session, executes the configured flow, and releases the
/// session on every path before the outcome (success or failure) is returned.
async fn run_one_item(
    client: &dyn SessionClient,
    config: &RunConfig,
    broker: &mut SessionBroker<'_>,
) -> Result<Vec<OutputRecord>> {
    let session = broker.acquire().await?;

    let result = match config.mode {
        ExecutionMode::Sql => run_sql_item(client, config, &session).await,
        ExecutionMode::Cl => run_cl_item(client, config, &session).await,
    };

    // Release before the result leaves the boundary, success or failure.
    match (result, broker.release_item(session).await) {
        (Ok(records), Ok(())) => Ok(records),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("failed to close session after item error: {close_err}");
            Err(e)
        }
    }
}

/// SQL flow: submit, execute the first page, fetch until the terminal page,
/// then shape the accumulated result.
async fn run_sql_item(
    client: &dyn SessionClient,
    config: &RunConfig,
    session: &Session,
) -> Result<Vec<OutputRecord>> {
    let options = build_query_options(&config.options)?;
    let handle = client
        .submit_query(session, &config.statement, &options)
        .await?;

    let first = client.execute_handle(&handle, config.fetch_size).await?;
    let metadata = first.metadata;
    let update_count = first.update_count;
    let mut rows = first.rows;
    let mut done = first.is_done;

    // No bound other than the server signaling done; a non-terminating
    // source is a caller-visible hang by design of this layer.
    while !done {
        let page = client.fetch_next_page(&handle, config.fetch_size).await?;
        rows.extend(page.rows);
        done = page.is_done;
    }

    debug!(rows = rows.len(), "sql statement fetched");

    Ok(match config.options.output_mode {
        OutputMode::Single => vec![shape_sql_aggregate(
            rows,
            metadata,
            update_count,
            config.options.include_metadata,
        )],
        OutputMode::PerRow => {
            shape_sql_per_row(rows, metadata, config.options.include_metadata)
        }
    })
}

/// CL flow: submit the command, execute the handle once, emit one record.
async fn run_cl_item(
    client: &dyn SessionClient,
    config: &RunConfig,
    session: &Session,
) -> Result<Vec<OutputRecord>> {
    let handle = client.submit_command(session, &config.statement).await?;
    let outcome = client.execute_command(&handle).await?;

    debug!(success = outcome.success, "cl command executed");

    Ok(vec![shape_command(
        outcome.success,
        outcome.data,
        outcome.error,
    )])
}

/// Builds the per-statement options from the run's tuning options.
///
/// The timeout is forwarded only when positive; parameters are parsed at most
/// once per item and only when binding is enabled.
fn build_query_options(opts: &AdditionalOptions) -> Result<QueryOptions> {
    let parameters = parse_parameters(opts.use_parameters, opts.parameters_json.as_deref())?;
    Ok(QueryOptions {
        terse_results: opts.terse_results,
        parameters,
        query_timeout_ms: (opts.query_timeout > 0).then_some(opts.query_timeout),
    })
}
