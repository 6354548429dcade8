//! Roster change notifications

use bevy::prelude::*;

use super::slot::UnitSlot;

/// Queued inside a `RosterManager` when a slot changes. Each change carries a
/// snapshot of the slot taken after the mutation completed.
#[derive(Clone, Debug, PartialEq)]
pub enum RosterChange {
    UnitSlot { slot_index: usize, slot: UnitSlot },
    BattleSlot { battle_index: usize, slot: UnitSlot },
}

/// Event fired when a roster slot changes
#[derive(Event, Clone, Debug)]
pub struct UnitSlotChanged {
    /// Entity owning the roster
    pub owner: Entity,
    pub slot_index: usize,
    pub slot: UnitSlot,
}

/// Event fired when a battle slot changes
#[derive(Event, Clone, Debug)]
pub struct BattleSlotChanged {
    /// Entity owning the roster
    pub owner: Entity,
    pub battle_index: usize,
    pub slot: UnitSlot,
}
