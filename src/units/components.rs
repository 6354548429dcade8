//! Unit and player components

use bevy::prelude::*;

use super::definitions::UnitKind;

/// Per-entity time scale.
///
/// The time coordinator zeroes `dilation` and clears `tick_enabled` to freeze
/// an entity, then restores the value it captured beforehand.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct LocalTimeScale {
    /// Multiplier applied to this entity's delta time (1.0 = natural speed)
    pub dilation: f32,
    /// Whether per-frame updates run for this entity
    pub tick_enabled: bool,
}

impl Default for LocalTimeScale {
    fn default() -> Self {
        Self {
            dilation: 1.0,
            tick_enabled: true,
        }
    }
}

impl LocalTimeScale {
    pub fn with_dilation(dilation: f32) -> Self {
        Self {
            dilation,
            tick_enabled: dilation > 0.0,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.dilation == 0.0
    }
}

/// Explicit time-pause immunity marker
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimePauseImmune {
    pub immune: bool,
}

impl Default for TimePauseImmune {
    fn default() -> Self {
        Self { immune: true }
    }
}

/// Marks the player-controlled character. Always immune to time pause.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct PlayerCharacter;

/// A summonable combat unit
#[derive(Component, Clone, Debug)]
#[require(LocalTimeScale, Health, Mana)]
pub struct Unit {
    pub kind: UnitKind,
}

/// Links a summoned unit back to the roster that produced it
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummonedBy {
    /// Entity owning the roster
    pub owner: Entity,
    /// Battle slot the unit was summoned from
    pub battle_index: usize,
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::full(100.0)
    }
}

impl Health {
    pub fn full(maximum: f32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Current health as a fraction of maximum (0 when maximum is not positive)
    pub fn fraction(&self) -> f32 {
        if self.maximum > 0.0 {
            self.current / self.maximum
        } else {
            0.0
        }
    }

    pub fn apply_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Mana {
    pub current: f32,
    pub maximum: f32,
    /// Mana regained per second at natural time scale
    pub regen_rate: f32,
}

impl Default for Mana {
    fn default() -> Self {
        Self {
            current: 100.0,
            maximum: 100.0,
            regen_rate: 0.0,
        }
    }
}

impl Mana {
    /// Current mana as a fraction of maximum (0 when maximum is not positive)
    pub fn fraction(&self) -> f32 {
        if self.maximum > 0.0 {
            self.current / self.maximum
        } else {
            0.0
        }
    }

    pub fn spend(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }
}

/// Player resource spent on time pause and summoning
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct ActionPoints {
    pub current: f32,
    pub maximum: f32,
    /// Points regained per second
    pub regen_rate: f32,
}

impl Default for ActionPoints {
    fn default() -> Self {
        Self {
            current: 100.0,
            maximum: 100.0,
            regen_rate: 5.0,
        }
    }
}

impl ActionPoints {
    /// Spend points if enough are available. Returns false and leaves the pool
    /// untouched otherwise.
    pub fn try_spend(&mut self, amount: f32) -> bool {
        if self.current < amount {
            return false;
        }
        self.current = (self.current - amount).clamp(0.0, self.maximum);
        true
    }

    pub fn regenerate(&mut self, delta_secs: f32) {
        if self.current < self.maximum {
            self.current = (self.current + self.regen_rate * delta_secs).min(self.maximum);
        }
    }
}
