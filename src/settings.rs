//! Named presets and JSON configuration files
//!
//! A preset is a ready-made `SimulationConfig`; anything more specific is
//! loaded from a JSON file and validated before use.

use std::fs;
use std::path::Path;

use glam::DVec2;
use thiserror::Error;

use crate::sim::{
    BodyConfig, BounceSignificance, ConfigError, FrictionModel, Launch, Perturbation,
    SimulationConfig,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

/// Built-in scene presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Classic,
    Energetic,
    Coulomb,
    Sliding,
    Cooldown,
    Noisy,
    Launched,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::Classic,
        Preset::Energetic,
        Preset::Coulomb,
        Preset::Sliding,
        Preset::Cooldown,
        Preset::Noisy,
        Preset::Launched,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "Classic",
            Preset::Energetic => "Energetic",
            Preset::Coulomb => "Coulomb",
            Preset::Sliding => "Sliding",
            Preset::Cooldown => "Cooldown",
            Preset::Noisy => "Noisy",
            Preset::Launched => "Launched",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "default" => Some(Preset::Classic),
            "energetic" => Some(Preset::Energetic),
            "coulomb" => Some(Preset::Coulomb),
            "sliding" | "slide" => Some(Preset::Sliding),
            "cooldown" => Some(Preset::Cooldown),
            "noisy" | "noise" => Some(Preset::Noisy),
            "launched" | "launch" => Some(Preset::Launched),
            _ => None,
        }
    }

    /// Scene configuration for this preset
    pub fn config(&self) -> SimulationConfig {
        let classic = SimulationConfig::default();
        match self {
            Preset::Classic => classic,
            Preset::Energetic => SimulationConfig {
                restitution: 1.05,
                friction: FrictionModel::ConstantDamping { factor: 0.995 },
                ..classic
            },
            Preset::Coulomb => SimulationConfig {
                friction: FrictionModel::Coulomb {
                    coefficient: 0.1,
                    static_threshold: 0.3,
                },
                ..classic
            },
            Preset::Sliding => SimulationConfig {
                friction: FrictionModel::Sliding {
                    coefficient: 0.02,
                    slide_threshold: 2.0,
                },
                ..classic
            },
            Preset::Cooldown => SimulationConfig {
                sound_cooldown: Some(0.15),
                ..classic
            },
            Preset::Noisy => SimulationConfig {
                perturbation: Some(Perturbation {
                    probability: 0.02,
                    max_impulse: 3.0,
                }),
                ..classic
            },
            Preset::Launched => SimulationConfig {
                bodies: vec![BodyConfig {
                    position: DVec2::new(300.0, 300.0),
                    launch: Launch::Polar {
                        speed: 12.0,
                        angle_degrees: -60.0,
                    },
                    ..Default::default()
                }],
                significance: BounceSignificance::SpeedDelta,
                ..classic
            },
        }
    }
}

/// Read and validate a JSON config file
pub fn load_config(path: impl AsRef<Path>) -> Result<SimulationConfig, SettingsError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let config: SimulationConfig = serde_json::from_str(&json)?;
    config.validate()?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write `config` as pretty-printed JSON
pub fn save_config(config: &SimulationConfig, path: impl AsRef<Path>) -> Result<(), SettingsError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    log::info!("Config saved to {}", path.display());
    Ok(())
}
