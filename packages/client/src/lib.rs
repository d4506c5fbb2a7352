//! Terminal chat client for the NightOwl relay.

pub mod config;
pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
pub mod ui;

pub use runner::{RetryPolicy, run_client, run_with_retry};
pub use session::run_session;
