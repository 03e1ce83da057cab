//! Runtime configuration for proof generation

use crate::backend::ArtifactPaths;
use log::warn;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_CIRCUITS_DIR: &str = "ZKSLA_CIRCUITS_DIR";
pub const ENV_PROVE_TIMEOUT_SECS: &str = "ZKSLA_PROVE_TIMEOUT_SECS";
pub const ENV_BIAS_THRESHOLD: &str = "ZKSLA_BIAS_THRESHOLD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZkSlaConfig {
    /// Directory holding the circuit manifest and Groth16 keys
    pub circuits_dir: PathBuf,
    /// Upper bound on a single proof generation
    pub prove_timeout: Duration,
    /// Bias threshold applied when a request does not carry one
    pub default_bias_threshold: u8,
}

impl Default for ZkSlaConfig {
    fn default() -> Self {
        Self {
            circuits_dir: ArtifactPaths::well_known().dir,
            prove_timeout: Duration::from_secs(120),
            default_bias_threshold: 5,
        }
    }
}

impl ZkSlaConfig {
    /// Defaults overridden by `ZKSLA_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(ENV_CIRCUITS_DIR).filter(|d| !d.trim().is_empty()) {
            config.circuits_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parsed::<u64>(&lookup, ENV_PROVE_TIMEOUT_SECS) {
            config.prove_timeout = Duration::from_secs(secs);
        }
        if let Some(threshold) = parsed::<u8>(&lookup, ENV_BIAS_THRESHOLD) {
            if threshold <= 100 {
                config.default_bias_threshold = threshold;
            } else {
                warn!("{}={} exceeds 100, keeping default", ENV_BIAS_THRESHOLD, threshold);
            }
        }
        config
    }

    pub fn artifacts(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(&self.circuits_dir)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ZkSlaConfig::default();
        assert_eq!(config.prove_timeout, Duration::from_secs(120));
        assert_eq!(config.default_bias_threshold, 5);
        assert!(config.circuits_dir.ends_with("circuits/compiled"));
    }

    #[test]
    fn test_env_overrides() {
        let config = ZkSlaConfig::from_lookup(lookup(&[
            (ENV_CIRCUITS_DIR, "/opt/zksla"),
            (ENV_PROVE_TIMEOUT_SECS, "30"),
            (ENV_BIAS_THRESHOLD, "10"),
        ]));
        assert_eq!(config.circuits_dir, PathBuf::from("/opt/zksla"));
        assert_eq!(config.prove_timeout, Duration::from_secs(30));
        assert_eq!(config.default_bias_threshold, 10);
        assert_eq!(config.artifacts().dir, PathBuf::from("/opt/zksla"));
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = ZkSlaConfig::from_lookup(lookup(&[
            (ENV_PROVE_TIMEOUT_SECS, "soon"),
            (ENV_BIAS_THRESHOLD, "250"),
        ]));
        assert_eq!(config, ZkSlaConfig::default());

        let config = ZkSlaConfig::from_lookup(lookup(&[(ENV_BIAS_THRESHOLD, "101")]));
        assert_eq!(config.default_bias_threshold, 5);
    }
}
