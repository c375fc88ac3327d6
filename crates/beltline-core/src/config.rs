//! Game configuration: serde structs, TOML loading, and validation.
//!
//! Defaults mirror the original game's settings: a 30x30 map with one iron
//! field (seed chance 0.3, two smoothing generations, at least 15 tiles)
//! and a 250 ms tick.

use crate::item::ItemType;
use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("map dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("building_refund_rate must be within 0..=1, got {0}")]
    InvalidRefundRate(f64),

    #[error("base_chance for {kind} must be within 0..=1, got {value}")]
    InvalidChance { kind: ItemType, value: f64 },

    #[error("frame_delay_ms and render_delay_ms must be positive")]
    ZeroDelay,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub game: EngineConfig,
}

impl GameConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.width == 0 || self.map.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.map.width,
                height: self.map.height,
            });
        }
        if !(0.0..=1.0).contains(&self.game.building_refund_rate) {
            return Err(ConfigError::InvalidRefundRate(
                self.game.building_refund_rate,
            ));
        }
        if self.game.frame_delay_ms == 0 || self.game.render_delay_ms == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        for field in &self.map.resources {
            if !(0.0..=1.0).contains(&field.base_chance) {
                return Err(ConfigError::InvalidChance {
                    kind: field.kind,
                    value: field.base_chance,
                });
            }
        }
        Ok(())
    }
}

/// Map shape, seed, and resource fields (in declaration order; earlier
/// entries win contested tiles).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_side")]
    pub width: u32,
    #[serde(default = "default_map_side")]
    pub height: u32,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_resources")]
    pub resources: Vec<ResourceFieldConfig>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: default_map_side(),
            height: default_map_side(),
            seed: 0,
            resources: default_resources(),
        }
    }
}

/// One resource field's generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceFieldConfig {
    pub kind: ItemType,
    pub base_chance: f64,
    pub generations: u32,
    pub min_tiles: u32,
    #[serde(default = "default_base_amount")]
    pub base_amount_per_tile: u32,
    #[serde(default = "default_additional_amount")]
    pub amount_per_additional_tile: u32,
}

/// Tick cadence, render cadence, and economy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_frame_delay")]
    pub frame_delay_ms: u64,
    #[serde(default = "default_render_delay")]
    pub render_delay_ms: u64,
    #[serde(default = "default_refund_rate")]
    pub building_refund_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: default_frame_delay(),
            render_delay_ms: default_render_delay(),
            building_refund_rate: default_refund_rate(),
        }
    }
}

fn default_map_side() -> u32 {
    30
}

fn default_frame_delay() -> u64 {
    250
}

fn default_render_delay() -> u64 {
    100
}

fn default_refund_rate() -> f64 {
    0.5
}

fn default_base_amount() -> u32 {
    50
}

fn default_additional_amount() -> u32 {
    10
}

fn default_resources() -> Vec<ResourceFieldConfig> {
    vec![ResourceFieldConfig {
        kind: ItemType::Iron,
        base_chance: 0.3,
        generations: 2,
        min_tiles: 15,
        base_amount_per_tile: default_base_amount(),
        amount_per_additional_tile: default_additional_amount(),
    }]
}
