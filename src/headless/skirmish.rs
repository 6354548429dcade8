//! Random skirmish damage for headless scenarios

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::units::{Health, LocalTimeScale, Unit};

/// Seeded random number generator for reproducible scenarios.
///
/// The same seed always produces the same damage rolls. Without a seed,
/// uses system entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Random f32 in [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Damage budget per second, from the scenario config
#[derive(Resource, Clone, Copy, Debug)]
pub struct SkirmishIntensity {
    pub damage_per_second: f32,
}

/// Chip away at every unit that is not frozen, scaled by its local time
pub fn apply_skirmish_damage(
    time: Res<Time>,
    intensity: Res<SkirmishIntensity>,
    mut rng: ResMut<GameRng>,
    mut units: Query<(&LocalTimeScale, &mut Health), With<Unit>>,
) {
    let budget = intensity.damage_per_second * time.delta_secs();
    if budget <= 0.0 {
        return;
    }
    for (scale, mut health) in units.iter_mut() {
        if !scale.tick_enabled || health.is_dead() {
            continue;
        }
        let damage = rng.random_range(0.0, budget) * scale.dilation;
        health.apply_damage(damage);
    }
}
