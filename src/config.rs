//! Gameplay configuration
//!
//! Tunable numbers for the time-pause and roster systems, loaded from
//! `assets/config/gameplay.ron`. Defaults match the shipped file so the
//! plugins work without any files present.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::units::definitions::{load_unit_definitions, UNITS_CONFIG_PATH};
use crate::units::UnitDefinitions;

/// Default location of the gameplay config file
pub const GAMEPLAY_CONFIG_PATH: &str = "assets/config/gameplay.ron";

/// Roster sizing and summon cost rates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Total roster slots (n)
    pub total_slots: usize,
    /// Battle slots (m), never more than `total_slots`
    pub battle_slots: usize,
    /// Action point cost per missing health percent
    pub health_restore_cost_per_percent: f32,
    /// Action point cost per missing mana percent
    pub mana_restore_cost_per_percent: f32,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            total_slots: 12,
            battle_slots: 4,
            health_restore_cost_per_percent: 1.0,
            mana_restore_cost_per_percent: 0.5,
        }
    }
}

/// Time coordinator upkeep
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Seconds between purges of despawned entities
    pub cleanup_interval_secs: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: 5.0,
        }
    }
}

/// Player time-pause ability tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimePauseConfig {
    pub action_point_cost: f32,
    /// Seconds between activations
    pub cooldown_secs: f32,
    /// Seconds before time resumes on its own (0 = manual resume only)
    #[serde(default)]
    pub pause_duration_secs: f32,
}

impl Default for TimePauseConfig {
    fn default() -> Self {
        Self {
            action_point_cost: 20.0,
            cooldown_secs: 5.0,
            pause_duration_secs: 0.0,
        }
    }
}

/// Player action point pool
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionPointConfig {
    pub maximum: f32,
    /// Points regained per second
    pub regen_rate: f32,
}

impl Default for ActionPointConfig {
    fn default() -> Self {
        Self {
            maximum: 100.0,
            regen_rate: 5.0,
        }
    }
}

/// Root structure for the gameplay.ron file
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameplayConfig {
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub time_pause: TimePauseConfig,
    #[serde(default)]
    pub action_points: ActionPointConfig,
}

impl GameplayConfig {
    /// Parse and validate a config from RON text
    pub fn from_ron(contents: &str) -> Result<Self, String> {
        let config: GameplayConfig =
            ron::from_str(contents).map_err(|e| format!("Failed to parse gameplay config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a RON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_ron(&contents).map_err(|e| format!("{} ({})", e, path.display()))
    }

    /// Load from the default path, or fall back to defaults if the file is missing or broken
    pub fn load_or_default() -> Self {
        let path = Path::new(GAMEPLAY_CONFIG_PATH);
        if !path.exists() {
            info!("No gameplay config found, using defaults");
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                info!("Loaded gameplay config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.roster.battle_slots > self.roster.total_slots {
            return Err(format!(
                "roster.battle_slots ({}) cannot exceed roster.total_slots ({})",
                self.roster.battle_slots, self.roster.total_slots
            ));
        }
        if self.roster.health_restore_cost_per_percent < 0.0
            || self.roster.mana_restore_cost_per_percent < 0.0
        {
            return Err("roster restore costs must be non-negative".to_string());
        }
        if self.time.cleanup_interval_secs <= 0.0 {
            return Err("time.cleanup_interval_secs must be positive".to_string());
        }
        if self.time_pause.action_point_cost < 0.0
            || self.time_pause.cooldown_secs < 0.0
            || self.time_pause.pause_duration_secs < 0.0
        {
            return Err("time_pause values must be non-negative".to_string());
        }
        if self.action_points.maximum <= 0.0 {
            return Err("action_points.maximum must be positive".to_string());
        }
        if self.action_points.regen_rate < 0.0 {
            return Err("action_points.regen_rate must be non-negative".to_string());
        }
        Ok(())
    }
}

/// Bevy plugin that loads gameplay config and unit definitions
///
/// Resources already present in the app (e.g. inserted by tests) are kept.
pub struct GameplayConfigPlugin;

impl Plugin for GameplayConfigPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameplayConfig>() {
            app.insert_resource(GameplayConfig::load_or_default());
        }

        if !app.world().contains_resource::<UnitDefinitions>() {
            match load_unit_definitions(Path::new(UNITS_CONFIG_PATH)) {
                Ok(definitions) => {
                    app.insert_resource(definitions);
                }
                Err(e) => {
                    warn!("{}; no unit types available for summoning", e);
                    app.init_resource::<UnitDefinitions>();
                }
            }
        }
    }
}
