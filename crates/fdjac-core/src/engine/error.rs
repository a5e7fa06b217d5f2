use thiserror::Error;

use super::config::ConfigError;
use crate::core::forward::ForwardError;

/// Cause of a single worker-task failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TaskCause {
    #[error("{0}")]
    Forward(#[from] ForwardError),

    #[error("Worker panicked: {0}")]
    Panic(String),

    #[error("Response has {actual} values, expected {expected}")]
    ResponseLength { expected: usize, actual: usize },
}

/// One failed worker task, identified by its dispatch index.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFailure {
    pub index: usize,
    pub cause: TaskCause,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Input '{0}' must not be empty")]
    EmptyInput(&'static str),

    #[error("Parameter {index} is zero; a multiplicative perturbation produces no step")]
    DegenerateStep { index: usize },

    #[error("{} worker task(s) failed: {}", .failures.len(), format_failures(.failures))]
    Batch { failures: Vec<TaskFailure> },
}

fn format_failures(failures: &[TaskFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("[task {}] {}", f.index, f.cause))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_error_lists_every_failing_index() {
        let error = EngineError::Batch {
            failures: vec![
                TaskFailure {
                    index: 1,
                    cause: TaskCause::Panic("boom".to_string()),
                },
                TaskFailure {
                    index: 4,
                    cause: TaskCause::Forward(ForwardError::Solve("diverged".to_string())),
                },
            ],
        };

        let message = error.to_string();

        assert!(message.contains("2 worker task(s) failed"));
        assert!(message.contains("[task 1] Worker panicked: boom"));
        assert!(message.contains("[task 4] Forward solve failed: diverged"));
    }

    #[test]
    fn degenerate_step_names_the_parameter() {
        let error = EngineError::DegenerateStep { index: 3 };
        assert!(error.to_string().contains("Parameter 3"));
    }
}
