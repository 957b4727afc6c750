//! Run execution: orchestration loop and parameter handling.

mod orchestrator;
pub(crate) mod params;

pub use orchestrator::{execute_run, WorkItem};
pub use params::parse_parameters;
