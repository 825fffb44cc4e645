//! Ingestion Service Module
//!
//! Front door of the system: turns client submissions into batches and answers
//! status queries.
//!
//! ## Workflow
//! 1. **Validate**: Every id of a submission must be in range, or nothing happens.
//! 2. **Split**: Ids are cut into consecutive batches of at most `batch_size`.
//! 3. **Schedule**: Batches go to the scheduler, sharing one submission instant.
//! 4. **Record**: The ingestion and its batches are kept for status lookups.

pub mod types;
pub mod protocol;
pub mod store;
pub mod service;
pub mod handlers;
