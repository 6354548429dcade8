//! Data-Driven Unit Definitions
//!
//! Unit types are identified by a `UnitKind` id and described in
//! `assets/config/units.ron`. The roster stores only the id; the definition
//! supplies maximum health and mana when a unit is summoned.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Default location of the unit definitions file
pub const UNITS_CONFIG_PATH: &str = "assets/config/units.ron";

/// Identifier of a unit type (e.g. "Swordsman")
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitKind(pub String);

impl UnitKind {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty id names no unit type
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitKind {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Stats for one unit type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub max_health: f32,
    pub max_mana: f32,
    /// Mana regained per second
    #[serde(default)]
    pub mana_regen: f32,
}

/// Root structure for the units.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct UnitsConfig {
    pub units: HashMap<UnitKind, UnitDefinition>,
}

/// Resource containing every known unit type.
#[derive(Resource, Debug, Default, Clone)]
pub struct UnitDefinitions {
    definitions: HashMap<UnitKind, UnitDefinition>,
}

impl UnitDefinitions {
    pub fn new(config: UnitsConfig) -> Self {
        Self {
            definitions: config.units,
        }
    }

    pub fn get(&self, kind: &UnitKind) -> Option<&UnitDefinition> {
        self.definitions.get(kind)
    }

    pub fn insert(&mut self, kind: UnitKind, definition: UnitDefinition) {
        self.definitions.insert(kind, definition);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// All defined unit kinds, sorted for stable output
    pub fn kinds(&self) -> Vec<&UnitKind> {
        let mut kinds: Vec<&UnitKind> = self.definitions.keys().collect();
        kinds.sort();
        kinds
    }

    /// Reject definitions that would break the vitals math
    pub fn validate(&self) -> Result<(), String> {
        for kind in self.kinds() {
            let def = &self.definitions[kind];
            if kind.is_empty() {
                return Err("Unit definitions contain an empty unit id".to_string());
            }
            if def.max_health <= 0.0 {
                return Err(format!("Unit {} must have positive max_health, got {}", kind, def.max_health));
            }
            if def.max_mana < 0.0 {
                return Err(format!("Unit {} must have non-negative max_mana, got {}", kind, def.max_mana));
            }
            if def.mana_regen < 0.0 {
                return Err(format!("Unit {} must have non-negative mana_regen, got {}", kind, def.mana_regen));
            }
        }
        Ok(())
    }
}

/// Parse unit definitions from RON text
pub fn parse_unit_definitions(contents: &str) -> Result<UnitDefinitions, String> {
    let config: UnitsConfig =
        ron::from_str(contents).map_err(|e| format!("Failed to parse unit definitions: {}", e))?;
    let definitions = UnitDefinitions::new(config);
    definitions.validate()?;
    Ok(definitions)
}

/// Load unit definitions from a RON file
pub fn load_unit_definitions(path: &Path) -> Result<UnitDefinitions, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let definitions = parse_unit_definitions(&contents)
        .map_err(|e| format!("{} ({})", e, path.display()))?;

    info!("Loaded {} unit definitions from {}", definitions.len(), path.display());

    Ok(definitions)
}
