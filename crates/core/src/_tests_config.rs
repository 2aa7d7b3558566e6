#![cfg(test)]

use super::config::{ConfigError, PlanConfig};
use super::dtype::Dtype;
use super::error::FftError;

#[test]
fn plan_config_parses_lowercase_dtypes() {
    let config = PlanConfig::from_toml_str(
        r#"
shape = [64, 32]
input = "complex128"
output = "real64"
"#,
    )
    .unwrap();

    assert_eq!(config.shape, vec![64, 32]);
    assert_eq!(config.input, Dtype::Complex128);
    assert_eq!(config.output, Dtype::Real64);
    assert_eq!(config.shape().unwrap().len(), 2048);
}

#[test]
fn plan_config_rejects_unknown_dtype() {
    let result = PlanConfig::from_toml_str(
        r#"
shape = [8]
input = "float16"
output = "complex64"
"#,
    );
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn plan_config_shape_is_validated() {
    let config = PlanConfig::from_toml_str(
        r#"
shape = [2, 2, 2, 2]
input = "real32"
output = "complex64"
"#,
    )
    .unwrap();
    assert!(matches!(
        config.shape(),
        Err(ConfigError::Plan(FftError::UnsupportedRank(4)))
    ));
}

#[test]
fn plan_config_round_trips_through_toml() {
    let config = PlanConfig {
        shape: vec![128],
        input: Dtype::Real32,
        output: Dtype::Complex64,
    };
    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("\"real32\""));
    assert_eq!(PlanConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn missing_config_file_is_an_io_error() {
    let result = PlanConfig::load("/nonexistent/gpufft/plan.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
