use nalgebra::DMatrix;
use tracing::{info, instrument};

use crate::core::forward::ForwardOperator;
use crate::engine::config::EvalConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;

/// Evaluates one forward response per row of `models`, populating
/// `out_responses` in place so that row `i` corresponds to `models` row `i`.
///
/// `out_responses` must be pre-allocated with one row per model and one column
/// per data value; shape violations are rejected before any evaluation starts.
#[instrument(skip_all, name = "responses_workflow")]
pub fn run(
    operator: &dyn ForwardOperator,
    models: &DMatrix<f64>,
    out_responses: &mut DMatrix<f64>,
    config: &EvalConfig,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    config.validate()?;

    reporter.report(Progress::PhaseStart {
        name: "Batch response evaluation",
    });

    tasks::responses::run(operator, models, out_responses, config, reporter)?;

    reporter.report(Progress::PhaseFinish);
    info!(rows = models.nrows(), "Batch response workflow complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forward::LinearOperator;
    use crate::engine::config::EvalConfigBuilder;

    #[test]
    fn populates_out_responses_in_place() {
        let g = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, -1.0]);
        let op = LinearOperator::new(g);
        let models = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut out = DMatrix::zeros(3, 2);
        let config = EvalConfigBuilder::new().worker_count(2).build().unwrap();

        run(&op, &models, &mut out, &config, &ProgressReporter::new()).unwrap();

        let expected = DMatrix::from_row_slice(3, 2, &[1.0, -2.0, 3.0, -4.0, 5.0, -6.0]);
        assert_eq!(out, expected);
    }

    #[test]
    fn shape_violation_surfaces_through_the_workflow() {
        let op = LinearOperator::new(DMatrix::zeros(2, 2));
        let models = DMatrix::from_row_slice(3, 2, &[0.0; 6]);
        let mut out = DMatrix::zeros(2, 2);
        let config = EvalConfigBuilder::new().build().unwrap();

        let result = run(&op, &models, &mut out, &config, &ProgressReporter::new());

        assert!(matches!(result, Err(EngineError::ShapeMismatch { .. })));
    }
}
