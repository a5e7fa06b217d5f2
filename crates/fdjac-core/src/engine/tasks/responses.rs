use nalgebra::DMatrix;
use tracing::{debug, info, instrument};

use crate::core::forward::ForwardOperator;
use crate::core::model::{Model, Response};
use crate::engine::config::EvalConfig;
use crate::engine::dispatch::run_batched;
use crate::engine::error::{EngineError, TaskCause, TaskFailure};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::threads::ThreadCountGuard;

/// Evaluates one forward response per row of `models`, writing row `i` of
/// `out_responses` from `models` row `i`.
///
/// With a worker count of one the models are evaluated sequentially in the
/// calling thread, skipping fan-out overhead entirely. Otherwise the same
/// batch-dispatch-join protocol as the Jacobian task applies, one task per
/// model row.
#[instrument(skip_all, name = "responses_task")]
pub(crate) fn run(
    operator: &dyn ForwardOperator,
    models: &DMatrix<f64>,
    out_responses: &mut DMatrix<f64>,
    config: &EvalConfig,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    validate_shapes(models, out_responses)?;

    let n_rows = models.nrows();
    let n_data = out_responses.ncols();

    info!(
        n_rows,
        n_data,
        workers = config.worker_count,
        "Computing batch responses"
    );
    reporter.report(Progress::TaskStart {
        total: n_rows as u64,
    });

    if config.worker_count == 1 {
        for index in 0..n_rows {
            let model = models.row(index).transpose();
            let response = evaluate_row(operator, &model, index, n_data)
                .map_err(|cause| EngineError::Batch {
                    failures: vec![TaskFailure { index, cause }],
                })?;
            out_responses.row_mut(index).copy_from(&response.transpose());
            reporter.report(Progress::TaskIncrement { amount: 1 });
        }
        reporter.report(Progress::TaskFinish);
        return Ok(());
    }

    let row_models: Vec<Model> = (0..n_rows).map(|i| models.row(i).transpose()).collect();

    let _guard = ThreadCountGuard::pin(operator);

    let responses = run_batched(n_rows, config.worker_count, reporter, |index| {
        evaluate_row(operator, &row_models[index], index, n_data)
    })?;

    for (index, response) in responses.into_iter().enumerate() {
        out_responses.row_mut(index).copy_from(&response.transpose());
    }

    reporter.report(Progress::TaskFinish);
    debug!("Batch responses complete");
    Ok(())
}

fn evaluate_row(
    operator: &dyn ForwardOperator,
    model: &Model,
    index: usize,
    n_data: usize,
) -> Result<Response, TaskCause> {
    let response = operator.response(model, index).map_err(TaskCause::Forward)?;
    if response.len() != n_data {
        return Err(TaskCause::ResponseLength {
            expected: n_data,
            actual: response.len(),
        });
    }
    Ok(response)
}

fn validate_shapes(models: &DMatrix<f64>, out_responses: &DMatrix<f64>) -> Result<(), EngineError> {
    if models.nrows() == 0 || models.ncols() == 0 {
        return Err(EngineError::EmptyInput("models"));
    }
    if out_responses.ncols() == 0 {
        return Err(EngineError::EmptyInput("out_responses"));
    }
    if out_responses.nrows() != models.nrows() {
        return Err(EngineError::ShapeMismatch {
            what: "out_responses rows",
            expected: models.nrows(),
            actual: out_responses.nrows(),
        });
    }
    Ok(())
}
