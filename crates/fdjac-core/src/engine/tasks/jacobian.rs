use tracing::{debug, info, instrument};

use crate::core::forward::ForwardOperator;
use crate::core::model::{Jacobian, Model, Response, perturb};
use crate::engine::config::EvalConfig;
use crate::engine::dispatch::run_batched;
use crate::engine::error::{EngineError, TaskCause};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::threads::ThreadCountGuard;

/// Computes a brute-force finite-difference Jacobian of shape
/// `n_data x n_model` around `base_model`.
///
/// One parameter at a time is scaled by the configured perturbation factor and
/// evaluated as a worker task; column `i` is `(response_i - base_response)`
/// divided by the realized delta of parameter `i`. Columns are written in
/// parameter order regardless of which task finished first.
#[instrument(skip_all, name = "jacobian_task")]
pub(crate) fn run(
    operator: &dyn ForwardOperator,
    base_model: &Model,
    base_response: &Response,
    config: &EvalConfig,
    reporter: &ProgressReporter,
) -> Result<Jacobian, EngineError> {
    let n_model = base_model.len();
    let n_data = base_response.len();

    if n_model == 0 {
        return Err(EngineError::EmptyInput("base_model"));
    }
    if n_data == 0 {
        return Err(EngineError::EmptyInput("base_response"));
    }

    // All perturbed models and realized deltas are prepared before any task
    // is dispatched, so a degenerate step fails fast with no partial work.
    let mut perturbed_models = Vec::with_capacity(n_model);
    let mut deltas = Vec::with_capacity(n_model);
    for index in 0..n_model {
        let (perturbed, delta) = perturb(base_model, index, config.perturbation_factor);
        if delta == 0.0 {
            return Err(EngineError::DegenerateStep { index });
        }
        perturbed_models.push(perturbed);
        deltas.push(delta);
    }

    info!(
        n_model,
        n_data,
        workers = config.worker_count,
        "Computing finite-difference Jacobian"
    );
    reporter.report(Progress::TaskStart {
        total: n_model as u64,
    });

    let _guard = ThreadCountGuard::pin(operator);

    let responses = run_batched(n_model, config.worker_count, reporter, |index| {
        let response = operator
            .response(&perturbed_models[index], index)
            .map_err(TaskCause::Forward)?;
        if response.len() != n_data {
            return Err(TaskCause::ResponseLength {
                expected: n_data,
                actual: response.len(),
            });
        }
        Ok(response)
    })?;

    let mut jacobian = Jacobian::zeros(n_data, n_model);
    for (index, response) in responses.into_iter().enumerate() {
        let column = (response - base_response) / deltas[index];
        jacobian.set_column(index, &column);
    }

    reporter.report(Progress::TaskFinish);
    debug!("Jacobian assembly complete");
    Ok(jacobian)
}
