//! Application layer for throwlist.
//!
//! Wires the pure rules of `throwlist-core` to a [`TaskStore`]: every action
//! reads a fresh snapshot, computes deltas, and commits them in bounded
//! chunks through [`BatchWriter`].

pub mod batch;
pub mod config;
pub mod error;
pub mod service;
pub mod task_store;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use batch::{BatchReport, BatchWriter};
pub use config::AppConfig;
pub use error::LifecycleError;
pub use service::TaskService;
pub use task_store::{DEFAULT_MAX_BATCH_SIZE, TaskStore};
