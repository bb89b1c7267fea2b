//! Simulation config: named match formats plus run defaults.
//! Loaded from TOML at runtime for the CLIs.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::engine::error::SimError;
use crate::engine::leg::SimRules;
use crate::engine::models::MatchFormat;

/// Run-wide defaults. Every field is optional in the file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Defaults {
    pub start_score: Option<u32>,
    pub max_visits_per_leg: Option<usize>,
    pub seed: Option<u64>,
    /// Name of the format used when none is given on the command line.
    pub format: Option<String>,
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SimConfig {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub formats: HashMap<String, MatchFormat>,
}

impl SimConfig {
    /// Reject settings that would make every leg unplayable.
    pub fn validate(&self) -> Result<(), SimError> {
        if let Some(start) = self.defaults.start_score {
            if start < 2 {
                return Err(SimError::Config(format!(
                    "start_score {} cannot be finished on a double",
                    start
                )));
            }
        }
        if self.defaults.max_visits_per_leg == Some(0) {
            return Err(SimError::Config("max_visits_per_leg must be at least 1".into()));
        }
        for (name, format) in &self.formats {
            format
                .validate()
                .map_err(|e| SimError::Config(format!("format '{}': {}", name, e)))?;
        }
        Ok(())
    }

    /// Leg rules, falling back to `SimRules::default()` for unset fields.
    pub fn rules(&self) -> SimRules {
        let d = SimRules::default();
        SimRules {
            start_score: self.defaults.start_score.unwrap_or(d.start_score),
            max_visits_per_leg: self.defaults.max_visits_per_leg.unwrap_or(d.max_visits_per_leg),
        }
    }

    /// Resolve a format by name; `None` picks the configured default format,
    /// then the built-in one.
    pub fn format(&self, name: Option<&str>) -> Result<MatchFormat, SimError> {
        let name = match name.or(self.defaults.format.as_deref()) {
            Some(n) => n,
            None => return Ok(MatchFormat::default()),
        };
        let format = self.formats.get(name).copied().ok_or_else(|| {
            let mut known: Vec<_> = self.formats.keys().cloned().collect();
            known.sort();
            SimError::Config(format!("unknown format '{}' (known: {:?})", name, known))
        })?;
        format.validate()?;
        Ok(format)
    }
}

/// Load and validate config from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<SimConfig, SimError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SimError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    let config: SimConfig = toml::from_str(&content)
        .map_err(|e| SimError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Where `load_default_config` looks, in order.
pub const CONFIG_SEARCH_PATHS: [&str; 3] = [
    "darts_sim.toml",
    "../darts_sim.toml",
    "/etc/darts-sim/darts_sim.toml",
];

/// First candidate that exists and loads cleanly. Missing files are skipped
/// quietly, broken ones with a warning.
pub fn load_first_config<P: AsRef<Path>>(candidates: &[P]) -> Option<SimConfig> {
    for candidate in candidates {
        let path = candidate.as_ref();
        if !path.exists() {
            continue;
        }
        match load_config(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), formats = config.formats.len(), "loaded simulation config");
                return Some(config);
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping simulation config"),
        }
    }
    None
}

/// Config from the standard locations, or the built-in defaults.
pub fn load_default_config() -> SimConfig {
    load_first_config(&CONFIG_SEARCH_PATHS).unwrap_or_else(|| {
        tracing::info!("no usable darts_sim.toml, using built-in defaults");
        SimConfig::default()
    })
}
