//! # Engine Module
//!
//! This module implements the evaluation engine: it fans forward-model
//! evaluations out across a bounded set of worker tasks, joins each batch at an
//! explicit barrier, and reassembles results in deterministic task order.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different
//! aspects of the fan-out:
//!
//! - **Configuration** ([`config`]) - Worker ceiling and perturbation settings
//! - **Dispatch** ([`dispatch`]) - Batched worker execution and failure aggregation
//! - **Progress Monitoring** ([`progress`]) - Progress reporting and user feedback mechanisms
//! - **Error Handling** ([`error`]) - Engine-specific error types and error propagation
//! - **Thread Guard** ([`threads`]) - Scoped pinning of the solver's internal thread count
//!
//! ## Key Capabilities
//!
//! - **Bounded parallelism**: the number of simultaneously live worker tasks
//!   never exceeds the configured worker count
//! - **Deterministic reassembly**: column/row `i` of a result always
//!   corresponds to task `i`, regardless of completion order
//! - **Explicit failure propagation**: every failing task is reported with its
//!   index after the batch joins; failures are never mistaken for responses

pub mod config;
pub(crate) mod dispatch;
pub mod error;
pub mod progress;
pub(crate) mod tasks;
pub(crate) mod threads;
