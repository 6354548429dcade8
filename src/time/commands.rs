//! World and `Commands` access to the time coordinator
//!
//! `TimeControlExt` lets exclusive code call the coordinator straight on a
//! `World`. The command structs let regular systems queue the same calls.
//! Every call is a no-op if no `TimeCoordinator` resource exists.

use bevy::ecs::world::Command;
use bevy::prelude::*;

use crate::units::TimePauseImmune;

use super::coordinator::TimeCoordinator;

/// `World::try_resource_scope` for bevy 0.15: runs `f` inside
/// `resource_scope`, or returns `None` if the resource doesn't exist.
pub(crate) trait TryResourceScope {
    fn try_resource_scope<R: Resource, U>(
        &mut self,
        f: impl FnOnce(&mut World, Mut<R>) -> U,
    ) -> Option<U>;
}

impl TryResourceScope for World {
    fn try_resource_scope<R: Resource, U>(
        &mut self,
        f: impl FnOnce(&mut World, Mut<R>) -> U,
    ) -> Option<U> {
        if !self.contains_resource::<R>() {
            return None;
        }
        Some(self.resource_scope(f))
    }
}

pub trait TimeControlExt {
    fn pause_time(&mut self, instigator: Entity) -> bool;
    fn resume_time(&mut self) -> bool;
    fn register_time_sensitive(&mut self, entity: Entity);
    fn unregister_time_sensitive(&mut self, entity: Entity);
    fn set_time_pause_immune(&mut self, entity: Entity, immune: bool);
    fn is_time_paused(&self) -> bool;
    fn is_immune_to_time_pause(&self, entity: Entity) -> bool;
    fn shutdown_time_coordinator(&mut self);
}

impl TimeControlExt for World {
    fn pause_time(&mut self, instigator: Entity) -> bool {
        self.try_resource_scope(|world, mut coordinator: Mut<TimeCoordinator>| {
            coordinator.pause_time(world, instigator)
        })
        .unwrap_or(false)
    }

    fn resume_time(&mut self) -> bool {
        self.try_resource_scope(|world, mut coordinator: Mut<TimeCoordinator>| {
            coordinator.resume_time(world)
        })
        .unwrap_or(false)
    }

    fn register_time_sensitive(&mut self, entity: Entity) {
        self.try_resource_scope(|world, mut coordinator: Mut<TimeCoordinator>| {
            coordinator.register_time_sensitive(world, entity)
        });
    }

    fn unregister_time_sensitive(&mut self, entity: Entity) {
        if let Some(mut coordinator) = self.get_resource_mut::<TimeCoordinator>() {
            coordinator.unregister_time_sensitive(entity);
        }
    }

    /// Set the entity's `TimePauseImmune` marker, adding one if needed.
    ///
    /// Turning immunity on also registers the entity; turning it off
    /// unregisters it.
    fn set_time_pause_immune(&mut self, entity: Entity, immune: bool) {
        if !self.entities().contains(entity) {
            return;
        }
        if self.get::<TimePauseImmune>(entity).is_some() {
            if let Some(mut marker) = self.get_mut::<TimePauseImmune>(entity) {
                marker.immune = immune;
            }
        } else if immune {
            self.entity_mut(entity).insert(TimePauseImmune { immune });
        }

        if immune {
            self.register_time_sensitive(entity);
        } else {
            self.unregister_time_sensitive(entity);
        }
    }

    fn is_time_paused(&self) -> bool {
        self.get_resource::<TimeCoordinator>()
            .is_some_and(|coordinator| coordinator.is_time_paused())
    }

    fn is_immune_to_time_pause(&self, entity: Entity) -> bool {
        self.get_resource::<TimeCoordinator>()
            .is_some_and(|coordinator| coordinator.is_immune_to_time_pause(self, entity))
    }

    fn shutdown_time_coordinator(&mut self) {
        self.try_resource_scope(|world, mut coordinator: Mut<TimeCoordinator>| {
            coordinator.shutdown(world)
        });
    }
}

pub struct PauseTime {
    pub instigator: Entity,
}

impl Command for PauseTime {
    fn apply(self, world: &mut World) {
        world.pause_time(self.instigator);
    }
}

pub struct ResumeTime;

impl Command for ResumeTime {
    fn apply(self, world: &mut World) {
        world.resume_time();
    }
}

pub struct RegisterTimeSensitive(pub Entity);

impl Command for RegisterTimeSensitive {
    fn apply(self, world: &mut World) {
        world.register_time_sensitive(self.0);
    }
}

pub struct UnregisterTimeSensitive(pub Entity);

impl Command for UnregisterTimeSensitive {
    fn apply(self, world: &mut World) {
        world.unregister_time_sensitive(self.0);
    }
}

pub struct SetTimePauseImmune {
    pub entity: Entity,
    pub immune: bool,
}

impl Command for SetTimePauseImmune {
    fn apply(self, world: &mut World) {
        world.set_time_pause_immune(self.entity, self.immune);
    }
}

pub struct ShutdownTimeCoordinator;

impl Command for ShutdownTimeCoordinator {
    fn apply(self, world: &mut World) {
        world.shutdown_time_coordinator();
    }
}
