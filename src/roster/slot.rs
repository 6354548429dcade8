//! Roster slot data

use serde::{Deserialize, Serialize};

use crate::units::UnitKind;

/// Lifecycle of a roster slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    #[default]
    Empty,
    /// Recruited and waiting in the reserve pool
    Available,
    /// Copied into a battle slot
    InBattle,
    /// Reserved for units placed on the field; nothing assigns it yet
    Deployed,
}

/// Action point price of restoring missing health and mana before summoning
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummonCostRates {
    /// Cost per missing health percent
    pub health_per_percent: f32,
    /// Cost per missing mana percent
    pub mana_per_percent: f32,
}

impl Default for SummonCostRates {
    fn default() -> Self {
        Self {
            health_per_percent: 1.0,
            mana_per_percent: 0.5,
        }
    }
}

/// One unit record, in the roster pool or copied into a battle slot.
///
/// Roster slots always carry their own position in `slot_index`. A battle
/// slot carries the index of the roster slot it was copied from, or `None`
/// once cleared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSlot {
    pub unit_kind: Option<UnitKind>,
    /// Health fraction (0-1)
    pub health_fraction: f32,
    /// Mana fraction (0-1)
    pub mana_fraction: f32,
    pub state: SlotState,
    pub slot_index: Option<usize>,
    pub unlocked: bool,
}

impl Default for UnitSlot {
    fn default() -> Self {
        Self {
            unit_kind: None,
            health_fraction: 1.0,
            mana_fraction: 1.0,
            state: SlotState::Empty,
            slot_index: None,
            unlocked: false,
        }
    }
}

impl UnitSlot {
    /// Default-empty slot sitting at `index` of the roster
    pub fn empty_at(index: usize) -> Self {
        Self {
            slot_index: Some(index),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unit_kind.is_none()
    }

    /// Stored state, except that a slot without a unit is always `Empty`
    pub fn effective_state(&self) -> SlotState {
        if self.is_empty() {
            SlotState::Empty
        } else {
            self.state
        }
    }

    /// Cost of topping this unit back up to full health and mana
    pub fn restore_cost(&self, rates: &SummonCostRates) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let missing_health = (1.0 - self.health_fraction).max(0.0);
        let missing_mana = (1.0 - self.mana_fraction).max(0.0);
        missing_health * 100.0 * rates.health_per_percent
            + missing_mana * 100.0 * rates.mana_per_percent
    }
}
