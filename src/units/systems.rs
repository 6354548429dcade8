//! Vitals upkeep systems

use bevy::prelude::*;

use super::components::{ActionPoints, LocalTimeScale, Mana, Unit};

/// Regenerate unit mana, scaled by each unit's local time.
///
/// Frozen units (tick disabled) gain nothing.
pub fn regenerate_unit_mana(
    time: Res<Time>,
    mut units: Query<(&LocalTimeScale, &mut Mana), With<Unit>>,
) {
    let dt = time.delta_secs();
    for (scale, mut mana) in units.iter_mut() {
        if !scale.tick_enabled || mana.regen_rate <= 0.0 {
            continue;
        }
        mana.current = (mana.current + mana.regen_rate * dt * scale.dilation).min(mana.maximum);
    }
}

/// Regenerate action points for every entity carrying them
pub fn regenerate_action_points(time: Res<Time>, mut pools: Query<&mut ActionPoints>) {
    let dt = time.delta_secs();
    for mut points in pools.iter_mut() {
        points.regenerate(dt);
    }
}
