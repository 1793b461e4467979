//! taskboard-api: HTTP implementations of the task and session services.

pub mod client;
pub mod session;
pub mod tasks;

pub use client::ApiClient;
pub use session::{AuthOutcome, SessionApi};
pub use tasks::HttpTaskService;
