//! Batch Executor Module
//!
//! Runs the unit of work for every batch, one batch at a time, under a global
//! rate limit on batch starts.
//!
//! ## Architecture Overview
//! 1. **Queueing**: Batches reach the scheduler over a channel and land in an
//!    ordered heap keyed by `(priority rank, submission instant)`.
//! 2. **Rate limiting**: At most one batch is dequeued per `rate_limit` interval,
//!    measured between consecutive starts.
//! 3. **Execution**: The dequeued batch goes `YetToStart -> Triggered`, its work
//!    runs to completion, then it ends `Completed` or, once retries are used up,
//!    `Failed`.
//!
//! ## Submodules
//! - **`types`**: Batch identity, priority and lifecycle state.
//! - **`queue`**: Generic min-heap with a caller-supplied ordering key.
//! - **`worker`**: The type-erased unit of work and its result contract.
//! - **`scheduler`**: The single-consumer loop and the handle used to feed it.

pub mod types;
pub mod queue;
pub mod worker;
pub mod scheduler;
