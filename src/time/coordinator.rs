//! Time Coordinator
//!
//! World-wide authority over time pause. Tracks which entities are subject to
//! freezing, which are immune, and the dilation each frozen entity had before
//! the pause so it can be restored exactly.
//!
//! Entities are held by `Entity` id. A despawned entity's id never resolves
//! again, so every pass over the tracked collections checks liveness first
//! and stale ids are purged lazily.

use bevy::ecs::entity::EntityHashMap;
use bevy::prelude::*;
use std::time::Duration;

use crate::units::{LocalTimeScale, PlayerCharacter, TimePauseImmune, Unit};

use super::events::TimePauseChanged;

/// Seconds between purges of despawned entities
pub const DEFAULT_CLEANUP_INTERVAL_SECS: f32 = 5.0;

#[derive(Resource, Debug)]
pub struct TimeCoordinator {
    paused: bool,
    instigator: Option<Entity>,
    /// Bumped on every successful pause
    pause_generation: u64,
    /// Registered entities, in registration order
    time_sensitive: Vec<Entity>,
    immune: Vec<Entity>,
    /// Dilation captured right before each freeze
    saved_dilations: EntityHashMap<f32>,
    cleanup_timer: Timer,
}

impl Default for TimeCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_CLEANUP_INTERVAL_SECS)
    }
}

fn is_alive(world: &World, entity: Entity) -> bool {
    world.entities().contains(entity)
}

fn push_unique(list: &mut Vec<Entity>, entity: Entity) -> bool {
    if list.contains(&entity) {
        return false;
    }
    list.push(entity);
    true
}

fn current_dilation(world: &World, entity: Entity) -> f32 {
    world
        .get::<LocalTimeScale>(entity)
        .map_or(1.0, |scale| scale.dilation)
}

fn set_dilation(world: &mut World, entity: Entity, dilation: f32) {
    if !is_alive(world, entity) {
        return;
    }
    match world.get_mut::<LocalTimeScale>(entity) {
        Some(mut scale) => {
            scale.dilation = dilation;
            scale.tick_enabled = dilation > 0.0;
        }
        None => {
            world
                .entity_mut(entity)
                .insert(LocalTimeScale::with_dilation(dilation));
        }
    }
}

impl TimeCoordinator {
    pub fn new(cleanup_interval_secs: f32) -> Self {
        Self {
            paused: false,
            instigator: None,
            pause_generation: 0,
            time_sensitive: Vec::new(),
            immune: Vec::new(),
            saved_dilations: EntityHashMap::default(),
            cleanup_timer: Timer::from_seconds(cleanup_interval_secs, TimerMode::Repeating),
        }
    }

    pub fn is_time_paused(&self) -> bool {
        self.paused
    }

    /// Entity that started the current pause
    pub fn instigator(&self) -> Option<Entity> {
        self.instigator
    }

    /// Identifies the current (or most recent) pause. Each pause gets a new value.
    pub fn pause_generation(&self) -> u64 {
        self.pause_generation
    }

    pub fn time_sensitive_entities(&self) -> &[Entity] {
        &self.time_sensitive
    }

    pub fn immune_entities(&self) -> &[Entity] {
        &self.immune
    }

    pub fn is_registered(&self, entity: Entity) -> bool {
        self.time_sensitive.contains(&entity)
    }

    /// Dilation saved for a currently frozen entity
    pub fn saved_dilation(&self, entity: Entity) -> Option<f32> {
        self.saved_dilations.get(&entity).copied()
    }

    pub fn frozen_count(&self) -> usize {
        self.saved_dilations.len()
    }

    /// Freeze every registered, non-immune entity.
    ///
    /// Does nothing and returns false if time is already paused or the
    /// instigator no longer exists. The instigator is immune until resume.
    pub fn pause_time(&mut self, world: &mut World, instigator: Entity) -> bool {
        if self.paused || !is_alive(world, instigator) {
            return false;
        }

        self.paused = true;
        self.pause_generation += 1;
        self.instigator = Some(instigator);
        push_unique(&mut self.immune, instigator);

        self.purge_dangling(world);
        let targets: Vec<Entity> = {
            let world: &World = world;
            self.time_sensitive
                .iter()
                .copied()
                .filter(|&entity| !self.is_immune_to_time_pause(world, entity))
                .collect()
        };
        for entity in targets {
            self.freeze(world, entity);
        }

        world.send_event(TimePauseChanged { paused: true });
        info!(
            "Time paused by {:?} ({} entities frozen)",
            instigator,
            self.saved_dilations.len()
        );
        true
    }

    /// Restore every frozen entity to its saved dilation.
    ///
    /// Returns false (and does nothing) when time is not paused.
    pub fn resume_time(&mut self, world: &mut World) -> bool {
        if !self.paused {
            return false;
        }

        self.paused = false;
        self.purge_dangling(world);
        for (entity, dilation) in self.saved_dilations.drain() {
            set_dilation(world, entity, dilation);
        }

        if let Some(instigator) = self.instigator.take() {
            self.immune.retain(|&entity| entity != instigator);
        }

        world.send_event(TimePauseChanged { paused: false });
        info!("Time resumed");
        true
    }

    /// Start tracking an entity. Registering twice has no extra effect.
    ///
    /// While time is paused a non-immune entity is frozen on the spot.
    pub fn register_time_sensitive(&mut self, world: &mut World, entity: Entity) {
        if !is_alive(world, entity) {
            return;
        }

        if push_unique(&mut self.time_sensitive, entity) {
            debug!("Registered time-sensitive entity {:?}", entity);
        }

        if self.paused
            && !self.saved_dilations.contains_key(&entity)
            && !self.is_immune_to_time_pause(world, entity)
        {
            self.freeze(world, entity);
        }
    }

    /// Stop tracking an entity.
    ///
    /// Its saved dilation is discarded without being restored: a frozen
    /// entity stays frozen until someone else resets its time scale.
    pub fn unregister_time_sensitive(&mut self, entity: Entity) {
        self.time_sensitive.retain(|&tracked| tracked != entity);
        self.saved_dilations.remove(&entity);
    }

    pub fn add_immune(&mut self, world: &World, entity: Entity) {
        if is_alive(world, entity) {
            push_unique(&mut self.immune, entity);
        }
    }

    /// Remove an entity from the immune list. The current instigator stays
    /// immune until time resumes.
    pub fn remove_immune(&mut self, entity: Entity) {
        if self.paused && self.instigator == Some(entity) {
            return;
        }
        self.immune.retain(|&immune| immune != entity);
    }

    /// Whether an entity is exempt from time pause: listed as immune,
    /// carrying an active `TimePauseImmune` marker, or the player character.
    pub fn is_immune_to_time_pause(&self, world: &World, entity: Entity) -> bool {
        if !is_alive(world, entity) {
            return false;
        }
        if self.immune.contains(&entity) {
            return true;
        }
        if world
            .get::<TimePauseImmune>(entity)
            .is_some_and(|marker| marker.immune)
        {
            return true;
        }
        world.get::<PlayerCharacter>(entity).is_some()
    }

    /// Drop despawned entities from every collection. Returns how many ids were purged.
    pub fn cleanup_invalid_references(&mut self, world: &World) -> usize {
        let purged = self.purge_dangling(world);
        if purged > 0 {
            debug!("Purged {} stale time-coordinator references", purged);
        }
        purged
    }

    /// Per-frame upkeep: periodic cleanup, and while paused, pick up any
    /// unit that was spawned without being registered.
    pub fn tick_maintenance(&mut self, world: &mut World, delta: Duration) {
        if self.cleanup_timer.tick(delta).just_finished() {
            self.cleanup_invalid_references(world);
        }

        if self.paused {
            let mut units = world.query_filtered::<Entity, With<Unit>>();
            let unregistered: Vec<Entity> = units
                .iter(world)
                .filter(|entity| !self.time_sensitive.contains(entity))
                .collect();
            for entity in unregistered {
                self.register_time_sensitive(world, entity);
            }
        }
    }

    /// Resume time if needed and forget every registration
    pub fn shutdown(&mut self, world: &mut World) {
        if self.paused {
            self.resume_time(world);
        }
        self.instigator = None;
        self.time_sensitive.clear();
        self.immune.clear();
        self.saved_dilations.clear();
    }

    fn freeze(&mut self, world: &mut World, entity: Entity) {
        self.saved_dilations
            .insert(entity, current_dilation(world, entity));
        set_dilation(world, entity, 0.0);
    }

    fn purge_dangling(&mut self, world: &World) -> usize {
        let before =
            self.time_sensitive.len() + self.immune.len() + self.saved_dilations.len();

        self.time_sensitive.retain(|&entity| is_alive(world, entity));
        self.immune.retain(|&entity| is_alive(world, entity));
        self.saved_dilations.retain(|&entity, _| is_alive(world, entity));

        if let Some(instigator) = self.instigator {
            if !is_alive(world, instigator) {
                self.instigator = None;
            }
        }

        before - (self.time_sensitive.len() + self.immune.len() + self.saved_dilations.len())
    }
}
