//! Time-pause ability
//!
//! The player spends action points to freeze time. Activating the ability
//! again while time is frozen resumes it. An optional pause duration arms a
//! timer that resumes time automatically.

use bevy::ecs::world::Command;
use bevy::prelude::*;

use crate::config::TimePauseConfig;
use crate::units::ActionPoints;

use super::commands::{PauseTime, ResumeTime, TimeControlExt};
use super::coordinator::TimeCoordinator;
use super::events::TimePauseRequested;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct TimePauseAbility {
    pub action_point_cost: f32,
    /// Seconds between activations
    pub cooldown: f32,
    /// Seconds before time resumes by itself (0 = manual)
    pub pause_duration: f32,
    /// World time of the last successful pause
    pub last_activation: Option<f32>,
}

impl Default for TimePauseAbility {
    fn default() -> Self {
        Self::from_config(&TimePauseConfig::default())
    }
}

impl TimePauseAbility {
    pub fn from_config(config: &TimePauseConfig) -> Self {
        Self {
            action_point_cost: config.action_point_cost,
            cooldown: config.cooldown_secs,
            pause_duration: config.pause_duration_secs,
            last_activation: None,
        }
    }

    pub fn is_on_cooldown(&self, now: f32) -> bool {
        self.last_activation
            .is_some_and(|last| now - last < self.cooldown)
    }

    /// Enough action points and off cooldown
    pub fn can_activate(&self, points: &ActionPoints, now: f32) -> bool {
        points.current >= self.action_point_cost && !self.is_on_cooldown(now)
    }
}

/// Timer that resumes time when a timed pause runs out.
///
/// Bound to the pause it was armed for: if that pause ends some other way,
/// the timer is dropped instead of cutting a later pause short.
#[derive(Resource, Default, Debug)]
pub struct PendingAutoResume {
    timer: Option<Timer>,
    pause_generation: u64,
}

impl PendingAutoResume {
    pub fn arm(&mut self, duration_secs: f32, pause_generation: u64) {
        self.timer = Some(Timer::from_seconds(duration_secs, TimerMode::Once));
        self.pause_generation = pause_generation;
    }

    pub fn cancel(&mut self) {
        self.timer = None;
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Pause generation the timer belongs to
    pub fn pause_generation(&self) -> u64 {
        self.pause_generation
    }
}

/// Pause time and arm the auto-resume timer for that pause
pub struct TimedPause {
    pub instigator: Entity,
    pub duration_secs: f32,
}

impl Command for TimedPause {
    fn apply(self, world: &mut World) {
        if !world.pause_time(self.instigator) {
            return;
        }
        let Some(generation) = world
            .get_resource::<TimeCoordinator>()
            .map(TimeCoordinator::pause_generation)
        else {
            return;
        };
        if let Some(mut pending) = world.get_resource_mut::<PendingAutoResume>() {
            pending.arm(self.duration_secs, generation);
        }
    }
}

/// Resolve time-pause activations in the order they were sent
pub fn handle_time_pause_requests(
    mut commands: Commands,
    mut requests: EventReader<TimePauseRequested>,
    time: Res<Time>,
    coordinator: Res<TimeCoordinator>,
    mut casters: Query<(&mut TimePauseAbility, &mut ActionPoints)>,
    mut auto_resume: ResMut<PendingAutoResume>,
) {
    let now = time.elapsed_secs();
    let mut paused = coordinator.is_time_paused();

    for request in requests.read() {
        let Ok((mut ability, mut points)) = casters.get_mut(request.caster) else {
            debug!("Ignoring time pause request from {:?}: no ability", request.caster);
            continue;
        };

        if paused {
            commands.queue(ResumeTime);
            auto_resume.cancel();
            paused = false;
            continue;
        }

        if !ability.can_activate(&points, now) {
            debug!(
                "Time pause refused for {:?} ({:.0} action points, on cooldown: {})",
                request.caster,
                points.current,
                ability.is_on_cooldown(now)
            );
            continue;
        }

        if !points.try_spend(ability.action_point_cost) {
            continue;
        }
        ability.last_activation = Some(now);
        paused = true;

        if ability.pause_duration > 0.0 {
            commands.queue(TimedPause {
                instigator: request.caster,
                duration_secs: ability.pause_duration,
            });
        } else {
            commands.queue(PauseTime {
                instigator: request.caster,
            });
        }
    }
}

/// Resume time once an armed pause duration has elapsed
pub fn tick_auto_resume(
    mut commands: Commands,
    time: Res<Time>,
    coordinator: Res<TimeCoordinator>,
    mut auto_resume: ResMut<PendingAutoResume>,
) {
    if !auto_resume.is_armed() {
        return;
    }
    if !coordinator.is_time_paused()
        || coordinator.pause_generation() != auto_resume.pause_generation
    {
        debug!("Dropping auto-resume timer: its pause already ended");
        auto_resume.cancel();
        return;
    }

    let Some(timer) = auto_resume.timer.as_mut() else {
        return;
    };
    if timer.tick(time.delta()).finished() {
        info!("Timed pause expired");
        commands.queue(ResumeTime);
        auto_resume.cancel();
    }
}
