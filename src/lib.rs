//! Dreamward - Time-Pause and Unit Roster Core
//!
//! Gameplay core for a real-time action game where the player can freeze
//! time for everything except themselves, and fights with a roster of
//! summonable units.
//!
//! This library exposes the gameplay modules for testing and reuse.

pub mod cli;
pub mod config;
pub mod headless;
pub mod roster;
pub mod time;
pub mod units;

// Re-export commonly used types
pub use config::GameplayConfig;
pub use headless::ScenarioConfig;
pub use roster::{RosterManager, SlotState, UnitSlot};
pub use time::{TimeControlExt, TimeCoordinator};
pub use units::{UnitDefinitions, UnitKind};
