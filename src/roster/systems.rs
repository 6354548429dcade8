//! Roster systems

use bevy::ecs::entity::Entities;
use bevy::prelude::*;

use super::events::{BattleSlotChanged, RosterChange, UnitSlotChanged};
use super::manager::RosterManager;

/// Publish queued roster changes as events
pub fn forward_roster_changes(
    mut rosters: Query<(Entity, &mut RosterManager)>,
    mut unit_slot_events: EventWriter<UnitSlotChanged>,
    mut battle_slot_events: EventWriter<BattleSlotChanged>,
) {
    for (owner, mut roster) in rosters.iter_mut() {
        if !roster.has_pending_changes() {
            continue;
        }
        for change in roster.take_changes() {
            match change {
                RosterChange::UnitSlot { slot_index, slot } => {
                    unit_slot_events.send(UnitSlotChanged {
                        owner,
                        slot_index,
                        slot,
                    });
                }
                RosterChange::BattleSlot { battle_index, slot } => {
                    battle_slot_events.send(BattleSlotChanged {
                        owner,
                        battle_index,
                        slot,
                    });
                }
            }
        }
    }
}

/// Forget summoned units that have been despawned
pub fn prune_summoned_units(mut rosters: Query<&mut RosterManager>, entities: &Entities) {
    for mut roster in rosters.iter_mut() {
        if roster.summoned_units().is_empty() {
            continue;
        }
        let dropped = roster.prune_summoned_units(|entity| entities.contains(entity));
        if dropped > 0 {
            debug!("Dropped {} despawned summoned units", dropped);
        }
    }
}
