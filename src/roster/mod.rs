//! Unit roster
//!
//! The player's pool of recruited units and the battle loadout drawn from it.

use bevy::prelude::*;

pub mod events;
pub mod manager;
pub mod slot;
pub mod systems;

pub use events::{BattleSlotChanged, RosterChange, UnitSlotChanged};
pub use manager::RosterManager;
pub use slot::{SlotState, SummonCostRates, UnitSlot};

use systems::*;

/// Plugin for roster change events and summon tracking
pub struct RosterPlugin;

impl Plugin for RosterPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<UnitSlotChanged>()
            .add_event::<BattleSlotChanged>()
            .add_systems(PostUpdate, (prune_summoned_units, forward_roster_changes));
    }
}
