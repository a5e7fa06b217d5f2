//! # Core Module
//!
//! Stateless foundations of the library: the numeric data model shared by every
//! layer, the forward-operator abstraction over the wrapped solver, and CSV I/O
//! for matrices and vectors.
//!
//! Nothing in this module spawns workers or holds evaluation state; it exists so
//! the [`crate::engine`] layer can operate on plain values and a single trait
//! seam.

pub mod forward;
pub mod io;
pub mod model;
