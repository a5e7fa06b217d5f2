use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use super::error::{EngineError, TaskCause, TaskFailure};
use super::progress::{Progress, ProgressReporter};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs `n_tasks` worker tasks in sequential batches of at most `worker_count`,
/// joining every task in a batch before the next batch starts.
///
/// The batch is the unit of synchronization: within it, all tasks are live
/// concurrently; collecting the batch is the join-all barrier. The returned
/// vector is ordered by task index, never by completion time. Each forward
/// evaluation may itself be a large solve, so the batch size is a hard ceiling
/// on simultaneous memory and CPU consumption.
///
/// A panic inside a task is caught and recorded against its index. If any task
/// in a batch fails, the remaining batches are not dispatched and every
/// failure gathered so far is reported in aggregate.
pub(crate) fn run_batched<T, F>(
    n_tasks: usize,
    worker_count: usize,
    reporter: &ProgressReporter,
    task: F,
) -> Result<Vec<T>, EngineError>
where
    T: Send,
    F: Fn(usize) -> Result<T, TaskCause> + Sync,
{
    debug_assert!(worker_count >= 1);

    let mut results = Vec::with_capacity(n_tasks);
    let mut failures: Vec<TaskFailure> = Vec::new();

    let indices: Vec<usize> = (0..n_tasks).collect();
    for batch in indices.chunks(worker_count) {
        let first = batch[0];
        let last = batch[batch.len() - 1] + 1;
        reporter.report(Progress::StatusUpdate {
            text: format!("tasks {first}..{last} / {n_tasks}"),
        });
        debug!(first, last, n_tasks, "Dispatching batch");

        let run_one = |&index: &usize| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(index)));
            match outcome {
                Ok(result) => (index, result),
                Err(payload) => (index, Err(TaskCause::Panic(panic_message(payload)))),
            }
        };

        #[cfg(feature = "parallel")]
        let batch_results: Vec<(usize, Result<T, TaskCause>)> =
            batch.par_iter().map(run_one).collect();

        #[cfg(not(feature = "parallel"))]
        let batch_results: Vec<(usize, Result<T, TaskCause>)> =
            batch.iter().map(run_one).collect();

        // The collect above is the join barrier; every task in the batch has
        // terminated before its result is inspected.
        for (index, result) in batch_results {
            match result {
                Ok(value) => results.push(value),
                Err(cause) => {
                    warn!(index, %cause, "Worker task failed");
                    failures.push(TaskFailure { index, cause });
                }
            }
        }

        reporter.report(Progress::TaskIncrement {
            amount: batch.len() as u64,
        });

        if !failures.is_empty() {
            return Err(EngineError::Batch { failures });
        }
    }

    Ok(results)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
