//! Headless scenario mode
//!
//! Plays a scripted skirmish without any graphical output: recruits a
//! roster, summons the battle loadout, lets the units take random damage,
//! freezes time for a window, and reports how the roster came out.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --scenario assets/scenarios/skirmish.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "roster": ["Swordsman", "Archer", "Mage"],
//!   "battle": [{ "battle_index": 0, "roster_index": 0 }],
//!   "pause_at": 2.0,
//!   "resume_at": 4.0,
//!   "max_duration_secs": 8.0
//! }
//! ```

pub mod config;
pub mod runner;
pub mod skirmish;

pub use config::{BattleAssignment, ScenarioConfig};
pub use runner::{
    build_scenario_app, run_scenario, step_until_complete, PauseLogEntry, ScenarioPlugin,
    ScenarioReport, UnitReport,
};
pub use skirmish::GameRng;
