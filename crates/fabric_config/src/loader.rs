//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{OracleKind, RunConfig};
use std::path::Path;

/// Loads and validates a `fabric.toml` configuration file.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are consistent.
fn validate_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.oracle.kind == OracleKind::External
        && config.oracle.bin.as_deref().unwrap_or("").is_empty()
    {
        return Err(ConfigError::MissingField("oracle.bin".to_string()));
    }
    if let Some(imbalance) = config.oracle.imbalance {
        if imbalance < 0.0 || imbalance.is_nan() {
            return Err(ConfigError::ValidationError(
                "oracle.imbalance must be >= 0".to_string(),
            ));
        }
    }
    if config.oracle.threads == 0 {
        return Err(ConfigError::ValidationError(
            "oracle.threads must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabric_part::{Granularity, ImbalanceMode, RepairScope};

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.oracle.kind, OracleKind::Builtin);
        assert_eq!(config.oracle.threads, 4);
        assert_eq!(config.oracle.imbalance, None);
        assert_eq!(config.trim.scope, RepairScope::ViolatorsOnly);
        assert!(config.hop.enabled);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[oracle]
kind = "external"
bin = "/opt/partitioner/bin/part"
threads = 8
seed = 42
imbalance = 0.05
imbalance_mode = "loosest"
objective = "connectivity_cut"

[trim]
pool_order = "ascending"
unit_order = "descending"
gain_order = "descending"
granularity = "one_by_one"
scope = "all_pools"
reach_radius = 2

[hop]
enabled = false
max_rounds = 16
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.oracle.kind, OracleKind::External);
        assert_eq!(config.oracle.bin.as_deref(), Some("/opt/partitioner/bin/part"));
        assert_eq!(config.oracle.seed, 42);
        assert_eq!(config.oracle.imbalance, Some(0.05));
        assert_eq!(config.oracle.imbalance_mode, ImbalanceMode::Loosest);
        assert_eq!(config.trim.granularity, Granularity::OneByOne);
        assert_eq!(config.trim.scope, RepairScope::AllPools);
        assert_eq!(config.trim.reach_radius, Some(2));
        assert!(!config.hop.enabled);
        assert_eq!(config.hop.max_rounds, 16);
    }

    #[test]
    fn external_without_bin_errors() {
        let toml = r#"
[oracle]
kind = "external"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn negative_imbalance_errors() {
        let toml = r#"
[oracle]
imbalance = -0.1
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_threads_errors() {
        let toml = r#"
[oracle]
threads = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn io_error_from_nonexistent_file() {
        let err = load_config(Path::new("/nonexistent/fabric.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
