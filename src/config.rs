//! Host-configurable parameters, loadable from a TOML file.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Which demonstration workload to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    /// Rotating textured cube with depth testing.
    Cube,
    /// Double-buffered cellular automaton.
    Life,
}

impl FromStr for DemoKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cube" => Ok(Self::Cube),
            "life" => Ok(Self::Life),
            other => Err(EngineError::Config(format!(
                "unknown demo '{other}' (expected 'cube' or 'life')"
            ))),
        }
    }
}

/// Largest supported grid edge. The cell shaders index instances with a
/// `u32`, so the cell count (`grid_size`²) must stay within that range;
/// 32768² = 2³⁰ does, 65536² does not.
pub const MAX_GRID_SIZE: u32 = 32_768;

/// Runtime configuration for the automaton workload and scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Cells per grid edge (the grid is square).
    pub grid_size: u32,
    /// Compute workgroup dimension per axis; dispatch counts are
    /// ceil(`grid_size` / `workgroup_size`) per axis.
    pub workgroup_size: u32,
    /// Milliseconds between automaton steps.
    pub update_interval_ms: u64,
    /// Probability that a cell starts alive, in `[0, 1]`.
    pub alive_probability: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: 32,
            workgroup_size: 8,
            update_interval_ms: 200,
            alive_probability: 0.4,
        }
    }
}

impl Config {
    /// Load and validate a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if the file cannot be read,
    /// [`EngineError::Config`] if it fails to parse or validate.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] naming the offending parameter.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.grid_size == 0 {
            return Err(EngineError::Config(
                "grid_size must be at least 1".into(),
            ));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(EngineError::Config(format!(
                "grid_size must be at most {MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        if self.workgroup_size == 0 {
            return Err(EngineError::Config(
                "workgroup_size must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.alive_probability) {
            return Err(EngineError::Config(format!(
                "alive_probability must be within [0, 1], got {}",
                self.alive_probability
            )));
        }
        Ok(())
    }

    /// The automaton's step cadence.
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_behavior() {
        let config = Config::default();
        assert_eq!(config.grid_size, 32);
        assert_eq!(config.workgroup_size, 8);
        assert_eq!(config.update_interval_ms, 200);
        assert!((config.alive_probability - 0.4).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml_over_defaults() {
        let config: Config =
            toml::from_str("grid_size = 64\nupdate_interval_ms = 50\n")
                .unwrap();
        assert_eq!(config.grid_size, 64);
        assert_eq!(config.update_interval_ms, 50);
        assert_eq!(config.workgroup_size, 8);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<Config, _> = toml::from_str("grid_szie = 64\n");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let config = Config {
            alive_probability: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_dimensions() {
        let config = Config {
            grid_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            workgroup_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_grids_past_the_instance_index_range() {
        let config = Config {
            grid_size: 65_536,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            grid_size: MAX_GRID_SIZE,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn demo_kind_parses_known_names() {
        assert_eq!("cube".parse::<DemoKind>().unwrap(), DemoKind::Cube);
        assert_eq!("life".parse::<DemoKind>().unwrap(), DemoKind::Life);
        assert!("sand".parse::<DemoKind>().is_err());
    }
}
