//! Units and player character
//!
//! Components shared by the time-pause and roster systems:
//! - Unit identity (`Unit`, `UnitKind`) and data-driven unit definitions
//! - Vitals (`Health`, `Mana`, `ActionPoints`)
//! - Per-entity time scale and time-pause immunity markers

use bevy::prelude::*;

pub mod components;
pub mod definitions;
pub mod systems;

pub use components::*;
pub use definitions::{load_unit_definitions, UnitDefinition, UnitDefinitions, UnitKind};

use systems::*;

/// Plugin for unit vitals upkeep
pub struct UnitsPlugin;

impl Plugin for UnitsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (regenerate_unit_mana, regenerate_action_points));
    }
}
