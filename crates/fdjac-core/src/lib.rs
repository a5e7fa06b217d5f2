//! # FDJAC Core Library
//!
//! A library for evaluating expensive forward models in parallel and assembling
//! brute-force finite-difference Jacobians from the results.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains the stateless data model (model and
//!   response vectors, Jacobian matrices), the [`core::forward::ForwardOperator`]
//!   trait that abstracts the wrapped numerical solver, and CSV I/O utilities.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer orchestrates the fan-out.
//!   It includes the batched dispatcher that bounds worker concurrency, the
//!   finite-difference and batch-response tasks, evaluator configuration, and the
//!   solver thread-count guard.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It ties the `engine` and `core` together to execute complete
//!   evaluation procedures, such as computing a full Jacobian for a base model.
//!
//! Forward operators are assumed to be CPU-bound and not safely re-entrant
//! across concurrent in-process calls against shared solver state, so each
//! evaluation of a perturbed model runs as an isolated worker task and the
//! number of simultaneously live tasks never exceeds the configured worker
//! count.

pub mod core;
pub mod engine;
pub mod workflows;
