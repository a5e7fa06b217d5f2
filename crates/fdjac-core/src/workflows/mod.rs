//! # Workflows Module
//!
//! The public, highest-level API. Each workflow validates its inputs, wires up
//! progress reporting, and delegates to the engine tasks.

pub mod jacobian;
pub mod responses;
