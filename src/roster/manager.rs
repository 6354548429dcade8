//! Roster Manager
//!
//! Owns a fixed-size pool of roster slots and a smaller set of battle slots.
//! Battle slots hold copies of roster data taken at assignment time; later
//! roster updates do not reach them until the slot is assigned again.
//!
//! Every mutation queues a `RosterChange` snapshot. `forward_roster_changes`
//! turns the queue into Bevy events once per frame. A manager that does not
//! live on an entity under `RosterPlugin` must drain it with `take_changes`,
//! otherwise the queue keeps growing until the next `initialize`.

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::config::RosterConfig;
use crate::units::{Health, Mana, SummonedBy, Unit, UnitDefinitions, UnitKind};

use super::events::RosterChange;
use super::slot::{SlotState, SummonCostRates, UnitSlot};

#[derive(Component, Debug, Clone)]
pub struct RosterManager {
    unit_slots: Vec<UnitSlot>,
    battle_slots: Vec<UnitSlot>,
    cost_rates: SummonCostRates,
    /// Units spawned by the last summon
    summoned: Vec<Entity>,
    pending_changes: SmallVec<[RosterChange; 4]>,
}

impl Default for RosterManager {
    fn default() -> Self {
        Self::from_config(&RosterConfig::default())
    }
}

impl RosterManager {
    pub fn new(total_slots: usize, battle_slots: usize) -> Self {
        let mut manager = Self {
            unit_slots: Vec::new(),
            battle_slots: Vec::new(),
            cost_rates: SummonCostRates::default(),
            summoned: Vec::new(),
            pending_changes: SmallVec::new(),
        };
        manager.initialize(total_slots, battle_slots);
        manager
    }

    pub fn from_config(config: &RosterConfig) -> Self {
        Self::new(config.total_slots, config.battle_slots).with_cost_rates(SummonCostRates {
            health_per_percent: config.health_restore_cost_per_percent,
            mana_per_percent: config.mana_restore_cost_per_percent,
        })
    }

    pub fn with_cost_rates(mut self, rates: SummonCostRates) -> Self {
        self.cost_rates = rates;
        self
    }

    /// Reset to `total_slots` empty roster slots and `battle_slots` empty battle slots.
    ///
    /// Destroys all current contents, queued changes and summon tracking.
    ///
    /// # Panics
    /// If `battle_slots` exceeds `total_slots`.
    pub fn initialize(&mut self, total_slots: usize, battle_slots: usize) {
        assert!(
            battle_slots <= total_slots,
            "battle slots ({}) cannot exceed total slots ({})",
            battle_slots,
            total_slots
        );

        self.unit_slots = (0..total_slots).map(UnitSlot::empty_at).collect();
        self.battle_slots = vec![UnitSlot::default(); battle_slots];
        self.summoned.clear();
        self.pending_changes.clear();
    }

    pub fn total_slots(&self) -> usize {
        self.unit_slots.len()
    }

    pub fn battle_slot_count(&self) -> usize {
        self.battle_slots.len()
    }

    pub fn reserve_slots(&self) -> usize {
        self.total_slots() - self.battle_slot_count()
    }

    pub fn cost_rates(&self) -> SummonCostRates {
        self.cost_rates
    }

    /// Put a unit into a roster slot. `None` picks the lowest-index empty slot.
    ///
    /// Fails without changing anything if the kind is empty, the index is out
    /// of range, or no slot is free.
    pub fn add_unit(&mut self, kind: UnitKind, slot_index: Option<usize>) -> bool {
        if kind.is_empty() {
            return false;
        }
        let Some(index) = slot_index.or_else(|| self.find_empty_slot()) else {
            return false;
        };
        if !self.is_valid_slot_index(index) {
            return false;
        }

        debug!("Roster slot {} <- {}", index, kind);
        self.unit_slots[index] = UnitSlot {
            unit_kind: Some(kind),
            health_fraction: 1.0,
            mana_fraction: 1.0,
            state: SlotState::Available,
            slot_index: Some(index),
            unlocked: true,
        };
        self.notify_slot_changed(index);
        true
    }

    /// Empty a roster slot.
    ///
    /// Battle slots copied from it are left alone and keep the old unit.
    pub fn remove_unit(&mut self, slot_index: usize) -> bool {
        match self.unit_slots.get(slot_index) {
            Some(slot) if !slot.is_empty() => {}
            _ => return false,
        }

        self.unit_slots[slot_index] = UnitSlot::empty_at(slot_index);
        self.notify_slot_changed(slot_index);
        true
    }

    /// Copy of a roster slot; an empty slot for an out-of-range index
    pub fn get_unit_slot(&self, slot_index: usize) -> UnitSlot {
        self.unit_slots
            .get(slot_index)
            .cloned()
            .unwrap_or_default()
    }

    pub fn all_units(&self) -> &[UnitSlot] {
        &self.unit_slots
    }

    /// Recruited, unlocked units waiting in the reserve pool
    pub fn get_available_units(&self) -> Vec<UnitSlot> {
        self.unit_slots
            .iter()
            .filter(|slot| slot.effective_state() == SlotState::Available && slot.unlocked)
            .cloned()
            .collect()
    }

    pub fn get_battle_units(&self) -> &[UnitSlot] {
        &self.battle_slots
    }

    /// Copy a roster slot into a battle slot, marking the copy `InBattle`.
    ///
    /// An empty roster slot is copied as-is.
    pub fn set_battle_slot(&mut self, battle_index: usize, slot_index: usize) -> bool {
        if !self.is_valid_battle_index(battle_index) || !self.is_valid_slot_index(slot_index) {
            return false;
        }

        let mut copy = self.unit_slots[slot_index].clone();
        copy.state = SlotState::InBattle;
        self.battle_slots[battle_index] = copy;
        self.notify_battle_slot_changed(battle_index);
        true
    }

    pub fn clear_battle_slot(&mut self, battle_index: usize) -> bool {
        if !self.is_valid_battle_index(battle_index) {
            return false;
        }
        self.battle_slots[battle_index] = UnitSlot::default();
        self.notify_battle_slot_changed(battle_index);
        true
    }

    pub fn clear_all_battle_slots(&mut self) {
        for index in 0..self.battle_slots.len() {
            self.battle_slots[index] = UnitSlot::default();
            self.notify_battle_slot_changed(index);
        }
    }

    /// Swap two battle slots. Both indices are notified, even when equal.
    pub fn swap_battle_slots(&mut self, a: usize, b: usize) -> bool {
        if !self.is_valid_battle_index(a) || !self.is_valid_battle_index(b) {
            return false;
        }
        self.battle_slots.swap(a, b);
        self.notify_battle_slot_changed(a);
        self.notify_battle_slot_changed(b);
        true
    }

    /// Action points needed to summon the battle roster at full health and mana
    pub fn calculate_summon_cost(&self) -> f32 {
        self.battle_slots
            .iter()
            .map(|slot| slot.restore_cost(&self.cost_rates))
            .sum()
    }

    pub fn can_summon_all(&self, available_budget: f32) -> bool {
        available_budget >= self.calculate_summon_cost()
    }

    /// Spawn every occupied battle slot in index order.
    ///
    /// Slot `i` spawns at `spawn_positions[i]`, or the origin when the list is
    /// too short. Health and mana start at the slot's fractions of the unit
    /// definition's maximums. Slots whose kind has no definition are skipped;
    /// the units that did spawn are kept.
    pub fn summon_battle_units(
        &mut self,
        commands: &mut Commands,
        definitions: &UnitDefinitions,
        spawn_positions: &[Vec3],
        owner: Entity,
    ) -> Vec<Entity> {
        self.summoned.clear();

        for (battle_index, slot) in self.battle_slots.iter().enumerate() {
            let Some(kind) = &slot.unit_kind else {
                continue;
            };
            let Some(definition) = definitions.get(kind) else {
                warn!("Cannot summon {} from battle slot {}: unknown unit kind", kind, battle_index);
                continue;
            };

            let position = spawn_positions
                .get(battle_index)
                .copied()
                .unwrap_or(Vec3::ZERO);

            let entity = commands
                .spawn((
                    Unit { kind: kind.clone() },
                    Name::new(definition.name.clone()),
                    Transform::from_translation(position),
                    Health {
                        current: definition.max_health * slot.health_fraction,
                        maximum: definition.max_health,
                    },
                    Mana {
                        current: definition.max_mana * slot.mana_fraction,
                        maximum: definition.max_mana,
                        regen_rate: definition.mana_regen,
                    },
                    SummonedBy {
                        owner,
                        battle_index,
                    },
                ))
                .id();
            self.summoned.push(entity);
        }

        info!("Summoned {} battle units for {:?}", self.summoned.len(), owner);
        self.summoned.clone()
    }

    /// Units spawned by the last summon that have not been pruned
    pub fn summoned_units(&self) -> &[Entity] {
        &self.summoned
    }

    /// Drop summoned units that no longer exist. Returns how many were dropped.
    pub fn prune_summoned_units(&mut self, is_alive: impl Fn(Entity) -> bool) -> usize {
        let before = self.summoned.len();
        self.summoned.retain(|&entity| is_alive(entity));
        before - self.summoned.len()
    }

    /// Overwrite a roster slot's stored fractions, clamped to 0-1
    pub fn update_unit_status(
        &mut self,
        slot_index: usize,
        health_fraction: f32,
        mana_fraction: f32,
    ) -> bool {
        if !self.is_valid_slot_index(slot_index) {
            return false;
        }
        let slot = &mut self.unit_slots[slot_index];
        slot.health_fraction = health_fraction.clamp(0.0, 1.0);
        slot.mana_fraction = mana_fraction.clamp(0.0, 1.0);
        self.notify_slot_changed(slot_index);
        true
    }

    /// Record a live unit's current vitals into its roster slot
    pub fn update_unit_from_actor(&mut self, slot_index: usize, health: &Health, mana: &Mana) -> bool {
        self.update_unit_status(slot_index, health.fraction(), mana.fraction())
    }

    /// Unlock a roster slot. Notifies even if it was already unlocked.
    pub fn unlock_slot(&mut self, slot_index: usize) -> bool {
        if !self.is_valid_slot_index(slot_index) {
            return false;
        }
        self.unit_slots[slot_index].unlocked = true;
        self.notify_slot_changed(slot_index);
        true
    }

    pub fn unlocked_slot_count(&self) -> usize {
        self.unit_slots.iter().filter(|slot| slot.unlocked).count()
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending_changes.is_empty()
    }

    /// Take every change queued since the last call, oldest first.
    ///
    /// Callers that keep a manager outside `RosterPlugin` are responsible for
    /// calling this regularly.
    pub fn take_changes(&mut self) -> SmallVec<[RosterChange; 4]> {
        std::mem::take(&mut self.pending_changes)
    }

    fn is_valid_slot_index(&self, slot_index: usize) -> bool {
        slot_index < self.unit_slots.len()
    }

    fn is_valid_battle_index(&self, battle_index: usize) -> bool {
        battle_index < self.battle_slots.len()
    }

    fn find_empty_slot(&self) -> Option<usize> {
        self.unit_slots.iter().position(UnitSlot::is_empty)
    }

    fn notify_slot_changed(&mut self, slot_index: usize) {
        let slot = self.unit_slots[slot_index].clone();
        self.pending_changes
            .push(RosterChange::UnitSlot { slot_index, slot });
    }

    fn notify_battle_slot_changed(&mut self, battle_index: usize) {
        let slot = self.battle_slots[battle_index].clone();
        self.pending_changes
            .push(RosterChange::BattleSlot { battle_index, slot });
    }
}
