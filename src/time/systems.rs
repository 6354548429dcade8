//! Time coordinator upkeep systems

use bevy::prelude::*;

use super::commands::{ShutdownTimeCoordinator, TryResourceScope};
use super::coordinator::TimeCoordinator;

/// Periodic cleanup and auto-registration of units spawned during a pause
pub fn time_coordinator_maintenance(world: &mut World) {
    let delta = world.resource::<Time>().delta();
    world.try_resource_scope(|world, mut coordinator: Mut<TimeCoordinator>| {
        coordinator.tick_maintenance(world, delta);
    });
}

/// Resume time and release every registration when the app exits
pub fn release_time_coordinator_on_exit(mut commands: Commands, mut exits: EventReader<AppExit>) {
    if exits.read().next().is_some() {
        commands.queue(ShutdownTimeCoordinator);
    }
}
