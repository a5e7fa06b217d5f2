use super::model::{Model, Response};
use nalgebra::DMatrix;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Errors raised by a forward operator while evaluating a model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForwardError {
    #[error("Model has {actual} parameters, operator expects {expected}")]
    ModelLength { expected: usize, actual: usize },

    #[error("Forward solve failed: {0}")]
    Solve(String),
}

/// The seam between the evaluator and the wrapped numerical solver.
///
/// Implementations are expected to be expensive and CPU-bound; the engine runs
/// each call as an isolated worker task and never invokes `response` for the
/// same operator concurrently beyond the configured worker ceiling.
///
/// The `task_index` passed to [`response`](ForwardOperator::response) is the
/// position of the task in dispatch order (the perturbed parameter index for a
/// Jacobian, the model row for a batch-response run). Operators that keep
/// per-task scratch state can key it by this index.
///
/// The thread-count hooks expose the solver's internal parallelism knob. The
/// engine pins it to one thread for the duration of a fan-out call so that
/// nested solver parallelism cannot race against task-level parallelism, and
/// restores the prior value on every exit path. Operators without an internal
/// thread pool keep the default no-op hooks.
pub trait ForwardOperator: Sync {
    /// Number of data values produced by one forward solve.
    fn response_len(&self) -> usize;

    /// Evaluates the forward model. Must be safe to call from a worker thread;
    /// must not rely on mutable state shared with other in-flight tasks.
    fn response(&self, model: &Model, task_index: usize) -> Result<Response, ForwardError>;

    /// Current internal solver thread count.
    fn thread_count(&self) -> usize {
        1
    }

    /// Reconfigures the internal solver thread count. Takes `&self` because
    /// the knob is shared, interior-mutable configuration.
    fn set_thread_count(&self, _threads: usize) {}
}

/// Dense linear forward operator `G * m`.
///
/// The standard reference operator for finite-difference code: its Jacobian is
/// `G` itself, independent of the model. Carries an atomic thread-count knob so
/// the engine's pin-and-restore discipline is observable in tests.
#[derive(Debug)]
pub struct LinearOperator {
    matrix: DMatrix<f64>,
    threads: AtomicUsize,
}

impl LinearOperator {
    pub fn new(matrix: DMatrix<f64>) -> Self {
        Self {
            matrix,
            threads: AtomicUsize::new(1),
        }
    }

    pub fn model_len(&self) -> usize {
        self.matrix.ncols()
    }
}

impl ForwardOperator for LinearOperator {
    fn response_len(&self) -> usize {
        self.matrix.nrows()
    }

    fn response(&self, model: &Model, _task_index: usize) -> Result<Response, ForwardError> {
        if model.len() != self.matrix.ncols() {
            return Err(ForwardError::ModelLength {
                expected: self.matrix.ncols(),
                actual: model.len(),
            });
        }
        Ok(&self.matrix * model)
    }

    fn thread_count(&self) -> usize {
        self.threads.load(Ordering::SeqCst)
    }

    fn set_thread_count(&self, threads: usize) {
        self.threads.store(threads, Ordering::SeqCst);
    }
}
