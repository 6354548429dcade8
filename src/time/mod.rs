//! Time pause
//!
//! Implements the world-wide time freeze:
//! - `TimeCoordinator` resource tracking frozen, immune and registered entities
//! - World extension trait and commands for driving it from systems
//! - The player's time-pause ability (action point cost, cooldown, timed pause)

use bevy::prelude::*;

pub mod ability;
pub mod commands;
pub mod coordinator;
pub mod events;
pub mod systems;

pub use ability::{PendingAutoResume, TimePauseAbility, TimedPause};
pub use commands::{
    PauseTime, RegisterTimeSensitive, ResumeTime, SetTimePauseImmune, ShutdownTimeCoordinator,
    TimeControlExt, UnregisterTimeSensitive,
};
pub use coordinator::TimeCoordinator;
pub use events::{TimePauseChanged, TimePauseRequested};

use crate::config::GameplayConfig;
use ability::{handle_time_pause_requests, tick_auto_resume};
use systems::{release_time_coordinator_on_exit, time_coordinator_maintenance};

/// Plugin for the time-pause system
pub struct TimeControlPlugin;

impl Plugin for TimeControlPlugin {
    fn build(&self, app: &mut App) {
        let cleanup_interval = app
            .world()
            .get_resource::<GameplayConfig>()
            .map_or(coordinator::DEFAULT_CLEANUP_INTERVAL_SECS, |config| {
                config.time.cleanup_interval_secs
            });

        app
            // Events
            .add_event::<TimePauseChanged>()
            .add_event::<TimePauseRequested>()
            // Resources
            .insert_resource(TimeCoordinator::new(cleanup_interval))
            .init_resource::<PendingAutoResume>()
            // Systems
            .add_systems(PreUpdate, time_coordinator_maintenance)
            .add_systems(Update, (handle_time_pause_requests, tick_auto_resume).chain())
            .add_systems(Last, release_time_coordinator_on_exit);
    }
}
