//! Colony configuration: one immutable struct passed into every action.
//!
//! Every section is `#[serde(default)]`, so a partial JSON document only
//! overrides the fields it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::params::{ChamberParams, OffshootParams, TessellationSettings, TunnelParams};

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{parameter} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{parameter} must be at least {min}, got {value}")]
    TooSmall {
        parameter: &'static str,
        value: usize,
        min: usize,
    },

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// All tunable parameters of a colony build.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    pub tunnel: TunnelParams,
    pub offshoots: OffshootParams,
    pub chambers: ChamberParams,
    pub tessellation: TessellationSettings,
    /// Seed for offshoot sampling. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl ColonyConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check every parameter against the ranges the authoring panels allow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("tunnel.radius", self.tunnel.radius, 0.0, 1.0)?;
        check_range("tunnel.taper", self.tunnel.taper, 0.0, 2.0)?;
        check_range("tunnel.bumpiness", self.tunnel.bumpiness, 0.0, 100.0)?;
        check_range("offshoots.density", self.offshoots.density, 0.0, 1.0)?;
        check_range("offshoots.radius", self.offshoots.radius, 0.0, 10.0)?;
        check_range("offshoots.taper", self.offshoots.taper, 0.0, 2.0)?;
        check_range("chambers.size", self.chambers.size, 0.0, 10.0)?;
        check_min("offshoots.max_attempts", self.offshoots.max_attempts, 1)?;
        check_min(
            "tessellation.profile_segments",
            self.tessellation.profile_segments,
            3,
        )?;
        check_min(
            "tessellation.path_divisions",
            self.tessellation.path_divisions,
            1,
        )?;
        check_min(
            "tessellation.chamber_outline_samples",
            self.tessellation.chamber_outline_samples,
            3,
        )?;
        check_min("chambers.bevel.segments", self.chambers.bevel.segments, 1)?;
        Ok(())
    }
}

fn check_range(parameter: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            parameter,
            value,
            min,
            max,
        })
    }
}

fn check_min(parameter: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::TooSmall {
            parameter,
            value,
            min,
        })
    }
}
