use crate::cli::JacobianArgs;
use crate::error::{CliError, Result};
use crate::progress::CliProgressHandler;
use fdjac::{
    core::{forward::{ForwardOperator, LinearOperator}, io},
    engine::progress::ProgressReporter,
    workflows,
};
use tracing::info;

pub fn run(args: JacobianArgs) -> Result<()> {
    let config = super::resolve_config(&args.eval, args.factor)?;

    info!("Loading operator matrix from {:?}", &args.eval.operator);
    let matrix = io::read_matrix(&args.eval.operator).map_err(|source| CliError::FileRead {
        path: args.eval.operator.clone(),
        source,
    })?;
    let operator = LinearOperator::new(matrix);

    info!("Loading base model from {:?}", &args.model);
    let base_model = io::read_vector(&args.model).map_err(|source| CliError::FileRead {
        path: args.model.clone(),
        source,
    })?;

    if base_model.len() != operator.model_len() {
        return Err(CliError::Argument(format!(
            "base model has {} parameters, operator expects {}",
            base_model.len(),
            operator.model_len()
        )));
    }

    let base_response = operator
        .response(&base_model, 0)
        .map_err(|e| CliError::Argument(format!("base response evaluation failed: {e}")))?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the Jacobian workflow...");
    let jacobian =
        workflows::jacobian::run(&operator, &base_model, &base_response, &config, &reporter)?;

    io::write_matrix(&args.output, &jacobian).map_err(|source| CliError::FileWrite {
        path: args.output.clone(),
        source,
    })?;

    println!(
        "✓ Jacobian ({} x {}) written to: {}",
        jacobian.nrows(),
        jacobian.ncols(),
        args.output.display()
    );
    Ok(())
}
