//! JSON configuration parsing for headless scenarios

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Place roster slot `roster_index` into battle slot `battle_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleAssignment {
    pub battle_index: usize,
    pub roster_index: usize,
}

/// Headless scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Unit kinds recruited into the roster, in slot order
    pub roster: Vec<String>,
    /// Battle loadout
    #[serde(default)]
    pub battle: Vec<BattleAssignment>,
    /// Spawn position per battle slot; missing entries spawn at the origin
    #[serde(default)]
    pub spawn_positions: Vec<[f32; 3]>,
    /// Seconds into the scenario at which the player pauses time
    #[serde(default)]
    pub pause_at: Option<f32>,
    /// Seconds into the scenario at which the player resumes time
    #[serde(default)]
    pub resume_at: Option<f32>,
    /// Upper bound of random damage each unfrozen unit takes per second
    #[serde(default = "default_damage_per_second")]
    pub damage_per_second: f32,
    /// Scenario length in seconds (default: 30)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for reproducible damage rolls
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_damage_per_second() -> f32 {
    8.0
}

fn default_max_duration() -> f32 {
    30.0
}

impl Default for ScenarioConfig {
    /// Built-in skirmish: three units fight, time freezes from 2s to 4s
    fn default() -> Self {
        Self {
            roster: vec![
                "Swordsman".to_string(),
                "Archer".to_string(),
                "Mage".to_string(),
                "Guardian".to_string(),
            ],
            battle: vec![
                BattleAssignment { battle_index: 0, roster_index: 0 },
                BattleAssignment { battle_index: 1, roster_index: 1 },
                BattleAssignment { battle_index: 2, roster_index: 2 },
            ],
            spawn_positions: vec![[-3.0, 0.0, 0.0], [0.0, 0.0, 2.0], [3.0, 0.0, 0.0]],
            pause_at: Some(2.0),
            resume_at: Some(4.0),
            damage_per_second: default_damage_per_second(),
            max_duration_secs: 8.0,
            random_seed: Some(7),
        }
    }
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario file: {}", e))?;

        let config: ScenarioConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.roster.is_empty() {
            return Err("roster must list at least one unit".to_string());
        }
        if let Some(name) = self.roster.iter().find(|name| name.trim().is_empty()) {
            return Err(format!("roster contains an empty unit name: {:?}", name));
        }

        for assignment in &self.battle {
            if assignment.roster_index >= self.roster.len() {
                return Err(format!(
                    "battle assignment roster_index {} is out of range (roster has {} units)",
                    assignment.roster_index,
                    self.roster.len()
                ));
            }
        }

        if let (Some(pause), Some(resume)) = (self.pause_at, self.resume_at) {
            if resume <= pause {
                return Err(format!(
                    "resume_at ({}) must come after pause_at ({})",
                    resume, pause
                ));
            }
        }

        if !self.damage_per_second.is_finite() || self.damage_per_second < 0.0 {
            return Err(format!(
                "damage_per_second must be a non-negative number, got {}",
                self.damage_per_second
            ));
        }
        if !self.max_duration_secs.is_finite() || self.max_duration_secs <= 0.0 {
            return Err(format!(
                "max_duration_secs must be a positive number, got {}",
                self.max_duration_secs
            ));
        }

        Ok(())
    }
}
