use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::movement::behaviors::{Arrive, Wander};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArriveConfig {
    pub slow_radius: f32,
    pub target_radius: f32,
}

impl Default for ArriveConfig {
    fn default() -> Self {
        Self {
            slow_radius: 500.0,
            target_radius: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    pub offset_distance: f32,
    pub radius: f32,
    /// In degrees, unlike `Wander::max_angle_change`.
    pub max_angle_change_deg: f32,
    /// Fixed seed for reproducible wandering. Seeded from entropy when missing.
    pub seed: Option<u64>,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            offset_distance: 6.0,
            radius: 4.0,
            max_angle_change_deg: 45.0,
            seed: None,
        }
    }
}

/// Tunables for the behaviors that have any.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub arrive: ArriveConfig,
    pub wander: WanderConfig,
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not load config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SteeringConfig {
    pub fn from_json_str(json_str: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<SteeringConfig>(json_str)?;

        if config.arrive.target_radius >= config.arrive.slow_radius {
            warn!(
                "Arrive target_radius ({}) is not below slow_radius ({}), speed will not ramp correctly",
                config.arrive.target_radius, config.arrive.slow_radius
            );
        }

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading steering config: {:?}", path);

        let json_str = std::fs::read_to_string(path)?;
        Self::from_json_str(&json_str)
    }

    pub fn arrive(&self) -> Arrive {
        Arrive::new(self.arrive.slow_radius, self.arrive.target_radius)
    }

    pub fn wander(&self) -> Wander {
        let mut wander = match self.wander.seed {
            Some(seed) => Wander::from_seed(seed),
            None => Wander::default(),
        };
        wander.set_wander_offset(self.wander.offset_distance);
        wander.set_wander_radius(self.wander.radius);
        wander.set_max_angle_change(self.wander.max_angle_change_deg.to_radians());

        wander
    }
}
