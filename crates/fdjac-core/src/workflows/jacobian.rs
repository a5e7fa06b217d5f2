use tracing::{info, instrument};

use crate::core::forward::ForwardOperator;
use crate::core::model::{Jacobian, Model, Response};
use crate::engine::config::EvalConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;

/// Computes the finite-difference Jacobian of `operator` around `base_model`.
///
/// `base_response` must be the response already evaluated at `base_model`; the
/// workflow does not re-evaluate it. The result has one row per data value and
/// one column per model parameter, with column `i` holding the sensitivity of
/// all outputs to parameter `i`.
#[instrument(skip_all, name = "jacobian_workflow")]
pub fn run(
    operator: &dyn ForwardOperator,
    base_model: &Model,
    base_response: &Response,
    config: &EvalConfig,
    reporter: &ProgressReporter,
) -> Result<Jacobian, EngineError> {
    config.validate()?;

    reporter.report(Progress::PhaseStart {
        name: "Jacobian evaluation",
    });

    let jacobian = tasks::jacobian::run(operator, base_model, base_response, config, reporter)?;

    reporter.report(Progress::PhaseFinish);
    info!(
        rows = jacobian.nrows(),
        columns = jacobian.ncols(),
        "Jacobian workflow complete"
    );
    Ok(jacobian)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forward::ForwardError;
    use crate::engine::config::{ConfigError, EvalConfigBuilder};

    /// Decoupled quadratic operator: `response[i] = model[i]^2`. Each output
    /// depends on exactly one parameter, so off-diagonal Jacobian entries must
    /// vanish and the diagonal must approximate `2 * m[i]`.
    struct SquareOperator {
        n: usize,
    }

    impl ForwardOperator for SquareOperator {
        fn response_len(&self) -> usize {
            self.n
        }

        fn response(&self, model: &Model, _index: usize) -> Result<Response, ForwardError> {
            Ok(model.map(|v| v * v))
        }
    }

    #[test]
    fn columns_depend_only_on_their_parameter() {
        let op = SquareOperator { n: 3 };
        let base_model = Model::from_vec(vec![1.0, 2.0, 4.0]);
        let base_response = op.response(&base_model, 0).unwrap();
        let config = EvalConfigBuilder::new()
            .worker_count(2)
            .perturbation_factor(1.0 + 1e-6)
            .build()
            .unwrap();

        let jacobian = run(
            &op,
            &base_model,
            &base_response,
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();

        for row in 0..3 {
            for column in 0..3 {
                let expected = if row == column {
                    2.0 * base_model[column]
                } else {
                    0.0
                };
                assert!(
                    (jacobian[(row, column)] - expected).abs() < 1e-4,
                    "entry ({row}, {column}) = {} expected {expected}",
                    jacobian[(row, column)]
                );
            }
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_any_work() {
        let op = SquareOperator { n: 2 };
        let base_model = Model::from_vec(vec![1.0, 2.0]);
        let base_response = op.response(&base_model, 0).unwrap();
        let config = EvalConfig {
            worker_count: 0,
            perturbation_factor: 1.05,
        };

        let result = run(
            &op,
            &base_model,
            &base_response,
            &config,
            &ProgressReporter::new(),
        );

        assert!(matches!(
            result,
            Err(EngineError::Config {
                source: ConfigError::InvalidWorkerCount(0)
            })
        ));
    }

    #[test]
    fn phases_are_reported_around_the_task() {
        let events = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));

        let op = SquareOperator { n: 2 };
        let base_model = Model::from_vec(vec![1.0, 2.0]);
        let base_response = op.response(&base_model, 0).unwrap();
        let config = EvalConfigBuilder::new().worker_count(2).build().unwrap();

        run(&op, &base_model, &base_response, &config, &reporter).unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert!(matches!(
            events.first(),
            Some(Progress::PhaseStart {
                name: "Jacobian evaluation"
            })
        ));
        assert!(matches!(events.last(), Some(Progress::PhaseFinish)));
    }
}
