//! Time-pause events

use bevy::prelude::*;

/// Sent after a pause or resume has been fully applied
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimePauseChanged {
    pub paused: bool,
}

/// Sent when a character activates the time-pause ability.
///
/// Toggles: resumes time if it is paused, otherwise tries to pause it.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimePauseRequested {
    pub caster: Entity,
}
