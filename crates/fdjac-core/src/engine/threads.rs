use crate::core::forward::ForwardOperator;
use tracing::debug;

/// Pins the operator's internal solver thread count to one for the lifetime of
/// the guard, restoring the saved value on drop.
///
/// Fan-out parallelizes across worker tasks; letting the solver also spread
/// each task over its own thread pool would oversubscribe the machine and race
/// the two levels of parallelism against each other. Dropping through any exit
/// path, including error returns, runs the restore.
pub struct ThreadCountGuard<'a> {
    operator: &'a dyn ForwardOperator,
    saved: usize,
}

impl<'a> ThreadCountGuard<'a> {
    pub fn pin(operator: &'a dyn ForwardOperator) -> Self {
        let saved = operator.thread_count();
        operator.set_thread_count(1);
        debug!(saved, "Pinned solver thread count to 1 for fan-out");
        Self { operator, saved }
    }
}

impl Drop for ThreadCountGuard<'_> {
    fn drop(&mut self) {
        self.operator.set_thread_count(self.saved);
        debug!(restored = self.saved, "Restored solver thread count");
    }
}
