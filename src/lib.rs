//! Batch Ingestion Service Library
//!
//! Accepts bulk id submissions, cuts them into fixed-size batches and processes
//! the batches in the background under a global rate limit, highest priority
//! first. Clients poll for the status of their submission.
//!
//! ## Modules
//! - **`executor`**: The batch model, the priority-ordered queue, the unit of work
//!   and the rate-limited scheduler loop that drives batches to completion.
//! - **`ingestion`**: Validation and batching of submissions, the in-memory store
//!   used for status queries, and the HTTP handlers.
//! - **`config`**: Layered configuration (optional file, then environment).
//! - **`error`**: Core errors and their HTTP rendering.
//! - **`app`**: Wires scheduler, service and router together.

pub mod app;
pub mod config;
pub mod error;
pub mod executor;
pub mod ingestion;
