//! Environment driven configuration for the host.

use crate::error::HostError;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// `RUST_LOG` filter directive
    pub log_filter: String,
    /// Base seed for deterministic dice and shuffles
    pub seed: Option<u64>,
    /// Directory for `<game-id>.json` snapshots; memory when unset
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed: None,
            snapshot_dir: None,
        }
    }
}

impl HostConfig {
    pub fn from_env() -> Result<Self, HostError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, so tests need not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HostError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into());

        let seed = match lookup("CATAN_SEED") {
            Some(raw) if !raw.trim().is_empty() => {
                Some(raw.trim().parse::<u64>().map_err(|e| {
                    HostError::InvalidConfig(format!("CATAN_SEED {:?}: {}", raw, e))
                })?)
            }
            _ => None,
        };

        let snapshot_dir = lookup("CATAN_SNAPSHOT_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            log_filter,
            seed,
            snapshot_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = HostConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = HostConfig::from_lookup(lookup(&[
            ("RUST_LOG", "catan_core=debug"),
            ("CATAN_SEED", " 42 "),
            ("CATAN_SNAPSHOT_DIR", "/tmp/games"),
        ]))
        .unwrap();

        assert_eq!(config.log_filter, "catan_core=debug");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.snapshot_dir, Some(PathBuf::from("/tmp/games")));
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        let result = HostConfig::from_lookup(lookup(&[("CATAN_SEED", "lots")]));
        assert!(
            matches!(result, Err(HostError::InvalidConfig(_))),
            "a non-numeric seed should not be ignored"
        );
    }
}
