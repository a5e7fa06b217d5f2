use crate::cli::ResponsesArgs;
use crate::error::{CliError, Result};
use crate::progress::CliProgressHandler;
use fdjac::{
    core::{forward::{ForwardOperator, LinearOperator}, io},
    engine::progress::ProgressReporter,
    workflows,
};
use nalgebra::DMatrix;
use tracing::info;

pub fn run(args: ResponsesArgs) -> Result<()> {
    let config = super::resolve_config(&args.eval, None)?;

    info!("Loading operator matrix from {:?}", &args.eval.operator);
    let matrix = io::read_matrix(&args.eval.operator).map_err(|source| CliError::FileRead {
        path: args.eval.operator.clone(),
        source,
    })?;
    let operator = LinearOperator::new(matrix);

    info!("Loading model batch from {:?}", &args.models);
    let models = io::read_matrix(&args.models).map_err(|source| CliError::FileRead {
        path: args.models.clone(),
        source,
    })?;

    if models.ncols() != operator.model_len() {
        return Err(CliError::Argument(format!(
            "model rows have {} parameters, operator expects {}",
            models.ncols(),
            operator.model_len()
        )));
    }

    let mut out_responses = DMatrix::zeros(models.nrows(), operator.response_len());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the batch-response workflow...");
    workflows::responses::run(&operator, &models, &mut out_responses, &config, &reporter)?;

    io::write_matrix(&args.output, &out_responses).map_err(|source| CliError::FileWrite {
        path: args.output.clone(),
        source,
    })?;

    println!(
        "✓ Responses ({} x {}) written to: {}",
        out_responses.nrows(),
        out_responses.ncols(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EvalArgs;
    use std::fs;

    #[test]
    fn end_to_end_responses_from_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        let operator_path = dir.path().join("g.csv");
        let models_path = dir.path().join("models.csv");
        let output_path = dir.path().join("resp.csv");
        fs::write(&operator_path, "1.0,0.0\n0.0,-1.0\n").unwrap();
        fs::write(&models_path, "1.0,2.0\n3.0,4.0\n").unwrap();

        let args = ResponsesArgs {
            eval: EvalArgs {
                operator: operator_path,
                config: None,
                workers: Some(2),
            },
            models: models_path,
            output: output_path.clone(),
        };

        run(args).unwrap();

        let responses = io::read_matrix(&output_path).unwrap();
        assert_eq!(responses, DMatrix::from_row_slice(2, 2, &[1.0, -2.0, 3.0, -4.0]));
    }

    #[test]
    fn mismatched_model_width_is_an_argument_error() {
        let dir = tempfile::tempdir().unwrap();
        let operator_path = dir.path().join("g.csv");
        let models_path = dir.path().join("models.csv");
        fs::write(&operator_path, "1.0,0.0\n").unwrap();
        fs::write(&models_path, "1.0,2.0,3.0\n").unwrap();

        let args = ResponsesArgs {
            eval: EvalArgs {
                operator: operator_path,
                config: None,
                workers: None,
            },
            models: models_path,
            output: dir.path().join("resp.csv"),
        };

        let result = run(args);

        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
