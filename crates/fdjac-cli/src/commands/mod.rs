use crate::cli::EvalArgs;
use crate::error::Result;
use fdjac::engine::config::EvalConfig;

pub mod jacobian;
pub mod responses;

/// Resolves the evaluator configuration from an optional TOML file plus CLI
/// overrides, re-validating after the overrides are applied.
fn resolve_config(eval: &EvalArgs, factor: Option<f64>) -> Result<EvalConfig> {
    let mut config = match &eval.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            EvalConfig::from_toml_str(&content)?
        }
        None => EvalConfig::default(),
    };

    if let Some(workers) = eval.workers {
        config.worker_count = workers;
    }
    if let Some(factor) = factor {
        config.perturbation_factor = factor;
    }
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use fdjac::engine::config::ConfigError;
    use std::fs;

    fn eval_args(config: Option<std::path::PathBuf>, workers: Option<usize>) -> EvalArgs {
        EvalArgs {
            operator: "g.csv".into(),
            config,
            workers,
        }
    }

    #[test]
    fn defaults_apply_without_a_config_file() {
        let config = resolve_config(&eval_args(None, None), None).unwrap();

        assert_eq!(config.worker_count, 1);
        assert_eq!(config.perturbation_factor, 1.05);
    }

    #[test]
    fn cli_overrides_win_over_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.toml");
        fs::write(&path, "worker_count = 2\nperturbation_factor = 1.1\n").unwrap();

        let config = resolve_config(&eval_args(Some(path), Some(8)), Some(1.01)).unwrap();

        assert_eq!(config.worker_count, 8);
        assert_eq!(config.perturbation_factor, 1.01);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let result = resolve_config(&eval_args(None, Some(0)), None);

        assert!(matches!(
            result,
            Err(CliError::Config(ConfigError::InvalidWorkerCount(0)))
        ));
    }
}
