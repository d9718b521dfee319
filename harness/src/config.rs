use std::{io::ErrorKind, path::PathBuf};

use serde::Deserialize;

use crate::error::{HarnessError, Result};
use crate::resolver::{ResolutionMode, DEFAULT_CONTRACT_NAME};

pub const CONFIG_FILE: &str = "harness.json";

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Build output directory holding `inputs/`, `proofs/` and `contracts/`.
    #[serde(skip)]
    pub artifact_root: PathBuf,
    pub resolution: ResolutionMode,
    pub contract_name: String,
    pub scenario_timeout_secs: u64,
    /// Drive scenarios concurrently instead of one after another.
    pub parallel: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            artifact_root: PathBuf::from("."),
            resolution: ResolutionMode::Auto,
            contract_name: DEFAULT_CONTRACT_NAME.to_string(),
            scenario_timeout_secs: 120,
            parallel: false,
        }
    }
}

impl HarnessConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        HarnessConfig {
            artifact_root: root.into(),
            ..Default::default()
        }
    }

    /// Defaults overlaid with `<root>/harness.json` when that file exists.
    pub async fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let path = root.join(CONFIG_FILE);
        let mut config = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<HarnessConfig>(&bytes)
                .map_err(|err| HarnessError::Config(format!("{}: {err}", path.display())))?,
            Err(err) if err.kind() == ErrorKind::NotFound => HarnessConfig::default(),
            Err(source) => return Err(HarnessError::Io { path, source }),
        };
        if config.contract_name.is_empty() {
            return Err(HarnessError::Config("contract_name must not be empty".into()));
        }
        if config.scenario_timeout_secs == 0 {
            return Err(HarnessError::Config(
                "scenario_timeout_secs must be positive".into(),
            ));
        }
        config.artifact_root = root;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: HarnessConfig =
            serde_json::from_str(r#"{ "resolution": "namespaced", "parallel": true }"#).unwrap();
        assert_eq!(config.resolution, ResolutionMode::Namespaced);
        assert!(config.parallel);
        assert_eq!(config.contract_name, "Verifier");
        assert_eq!(config.scenario_timeout_secs, 120);
    }

    #[test]
    fn unknown_keys_are_refused() {
        assert!(serde_json::from_str::<HarnessConfig>(r#"{ "only": true }"#).is_err());
    }
}
