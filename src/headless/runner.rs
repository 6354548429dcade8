//! Headless scenario execution
//!
//! Runs a scripted skirmish on a fixed 60 Hz timestep without any
//! graphical output, then hands back a `ScenarioReport`.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::config::{GameplayConfig, GameplayConfigPlugin};
use crate::roster::{RosterManager, RosterPlugin};
use crate::time::ability::handle_time_pause_requests;
use crate::time::{
    RegisterTimeSensitive, TimeControlExt, TimeControlPlugin, TimeCoordinator, TimePauseAbility,
    TimePauseChanged, TimePauseRequested,
};
use crate::units::definitions::{load_unit_definitions, UNITS_CONFIG_PATH};
use crate::units::{
    ActionPoints, Health, Mana, PlayerCharacter, SummonedBy, Unit, UnitDefinitions, UnitKind,
    UnitsPlugin,
};

use super::config::ScenarioConfig;
use super::skirmish::{apply_skirmish_damage, GameRng, SkirmishIntensity};

const FRAME_SECS: f64 = 1.0 / 60.0;

/// Final state of one summoned unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitReport {
    pub kind: UnitKind,
    pub battle_index: usize,
    pub health_fraction: f32,
    pub mana_fraction: f32,
}

/// One pause-state change observed during the scenario
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauseLogEntry {
    /// Scenario time in seconds
    pub at: f32,
    pub paused: bool,
}

/// Outcome of a completed scenario
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub elapsed_secs: f32,
    pub units: Vec<UnitReport>,
    pub pause_log: Vec<PauseLogEntry>,
    /// Most entities frozen at once
    pub peak_frozen: usize,
    /// Action points needed to restore the battle roster
    pub summon_cost: f32,
    pub action_points: f32,
    pub can_summon_all: bool,
    pub random_seed: Option<u64>,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scenario finished after {:.1}s", self.elapsed_secs)?;
        if let Some(seed) = self.random_seed {
            writeln!(f, "  Seed: {}", seed)?;
        }
        for entry in &self.pause_log {
            let label = if entry.paused { "paused" } else { "resumed" };
            writeln!(f, "  {:>6.2}s time {}", entry.at, label)?;
        }
        writeln!(f, "  Peak frozen entities: {}", self.peak_frozen)?;
        for unit in &self.units {
            writeln!(
                f,
                "  [{}] {:<10} health {:>5.1}%  mana {:>5.1}%",
                unit.battle_index,
                unit.kind,
                unit.health_fraction * 100.0,
                unit.mana_fraction * 100.0
            )?;
        }
        write!(
            f,
            "  Summon cost {:.1} / {:.1} action points ({})",
            self.summon_cost,
            self.action_points,
            if self.can_summon_all { "affordable" } else { "not affordable" }
        )
    }
}

/// Resource to track headless scenario state
#[derive(Resource)]
pub struct ScenarioState {
    pub config: ScenarioConfig,
    pub player: Option<Entity>,
    pub pause_sent: bool,
    pub resume_sent: bool,
    pub pause_log: Vec<PauseLogEntry>,
    pub peak_frozen: usize,
    pub complete: bool,
    pub report: Option<ScenarioReport>,
}

/// Plugin for headless scenario execution
pub struct ScenarioPlugin {
    pub config: ScenarioConfig,
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        let rng = match self.config.random_seed {
            Some(seed) => GameRng::from_seed(seed),
            None => GameRng::from_entropy(),
        };

        app.insert_resource(rng)
            .insert_resource(SkirmishIntensity {
                damage_per_second: self.config.damage_per_second,
            })
            .insert_resource(ScenarioState {
                config: self.config.clone(),
                player: None,
                pause_sent: false,
                resume_sent: false,
                pause_log: Vec::new(),
                peak_frozen: 0,
                complete: false,
                report: None,
            })
            .add_systems(Startup, setup_scenario)
            .add_systems(
                Update,
                (
                    scenario_timeline.before(handle_time_pause_requests),
                    apply_skirmish_damage,
                ),
            )
            .add_systems(PostUpdate, (record_pause_changes, finish_scenario).chain());
    }
}

/// Spawn the player, recruit the roster, and summon the battle loadout
fn setup_scenario(
    mut commands: Commands,
    mut state: ResMut<ScenarioState>,
    gameplay: Res<GameplayConfig>,
    definitions: Res<UnitDefinitions>,
) {
    let player = commands.spawn_empty().id();
    let mut roster = RosterManager::from_config(&gameplay.roster);

    for name in &state.config.roster {
        if !roster.add_unit(UnitKind::new(name.as_str()), None) {
            warn!("Could not recruit {}: roster is full", name);
        }
    }
    for assignment in &state.config.battle {
        if !roster.set_battle_slot(assignment.battle_index, assignment.roster_index) {
            warn!(
                "Invalid battle assignment {} <- {}",
                assignment.battle_index, assignment.roster_index
            );
        }
    }

    let positions: Vec<Vec3> = state
        .config
        .spawn_positions
        .iter()
        .map(|&[x, y, z]| Vec3::new(x, y, z))
        .collect();
    let summoned = roster.summon_battle_units(&mut commands, &definitions, &positions, player);
    for unit in summoned {
        commands.queue(RegisterTimeSensitive(unit));
    }

    commands.entity(player).insert((
        Name::new("Player"),
        PlayerCharacter,
        Transform::default(),
        roster,
        ActionPoints {
            current: gameplay.action_points.maximum,
            maximum: gameplay.action_points.maximum,
            regen_rate: gameplay.action_points.regen_rate,
        },
        TimePauseAbility::from_config(&gameplay.time_pause),
    ));
    state.player = Some(player);

    info!(
        "Scenario setup complete: {} recruits, {} battle assignments",
        state.config.roster.len(),
        state.config.battle.len()
    );
}

/// Fire the scripted pause and resume activations
fn scenario_timeline(
    time: Res<Time>,
    mut state: ResMut<ScenarioState>,
    mut requests: EventWriter<TimePauseRequested>,
) {
    let Some(player) = state.player else {
        return;
    };
    let now = time.elapsed_secs();

    if !state.pause_sent && state.config.pause_at.is_some_and(|at| now >= at) {
        state.pause_sent = true;
        requests.send(TimePauseRequested { caster: player });
    } else if state.pause_sent
        && !state.resume_sent
        && state.config.resume_at.is_some_and(|at| now >= at)
    {
        state.resume_sent = true;
        requests.send(TimePauseRequested { caster: player });
    }
}

fn record_pause_changes(
    time: Res<Time>,
    coordinator: Res<TimeCoordinator>,
    mut changes: EventReader<TimePauseChanged>,
    mut state: ResMut<ScenarioState>,
) {
    let now = time.elapsed_secs();
    for change in changes.read() {
        state.pause_log.push(PauseLogEntry {
            at: now,
            paused: change.paused,
        });
    }
    state.peak_frozen = state.peak_frozen.max(coordinator.frozen_count());
}

/// Write unit vitals back into the roster and build the report
fn finish_scenario(
    time: Res<Time>,
    mut state: ResMut<ScenarioState>,
    mut rosters: Query<(&mut RosterManager, &ActionPoints)>,
    units: Query<(&Unit, &SummonedBy, &Health, &Mana)>,
) {
    let elapsed = time.elapsed_secs();
    if state.complete || elapsed < state.config.max_duration_secs {
        return;
    }
    let Some(player) = state.player else {
        return;
    };
    let Ok((mut roster, points)) = rosters.get_mut(player) else {
        return;
    };

    let mut unit_reports = Vec::new();
    for (unit, summoned_by, health, mana) in units.iter() {
        if summoned_by.owner != player {
            continue;
        }
        let Some(source) = roster
            .get_battle_units()
            .get(summoned_by.battle_index)
            .map(|slot| slot.slot_index)
        else {
            warn!(
                "Summoned {} points at missing battle slot {}",
                unit.kind, summoned_by.battle_index
            );
            continue;
        };
        if let Some(slot_index) = source {
            roster.update_unit_from_actor(slot_index, health, mana);
        }
        unit_reports.push(UnitReport {
            kind: unit.kind.clone(),
            battle_index: summoned_by.battle_index,
            health_fraction: health.fraction(),
            mana_fraction: mana.fraction(),
        });
    }
    unit_reports.sort_by_key(|report| report.battle_index);

    // Battle slots hold copies; refresh them from the updated roster
    let sources: Vec<(usize, usize)> = roster
        .get_battle_units()
        .iter()
        .enumerate()
        .filter_map(|(battle_index, slot)| slot.slot_index.map(|source| (battle_index, source)))
        .collect();
    for (battle_index, source) in sources {
        roster.set_battle_slot(battle_index, source);
    }

    let summon_cost = roster.calculate_summon_cost();
    let report = ScenarioReport {
        elapsed_secs: elapsed,
        units: unit_reports,
        pause_log: state.pause_log.clone(),
        peak_frozen: state.peak_frozen,
        summon_cost,
        action_points: points.current,
        can_summon_all: roster.can_summon_all(points.current),
        random_seed: state.config.random_seed,
    };

    info!("Scenario complete after {:.1}s", elapsed);
    state.report = Some(report);
    state.complete = true;
}

/// Build a scenario app stepping a fixed 60 Hz clock.
///
/// Does not install logging, so tests can build several apps in one process.
pub fn build_scenario_app(
    config: ScenarioConfig,
    gameplay: GameplayConfig,
    definitions: UnitDefinitions,
) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            FRAME_SECS,
        )))
        .insert_resource(gameplay)
        .insert_resource(definitions)
        .add_plugins((
            GameplayConfigPlugin,
            UnitsPlugin,
            TimeControlPlugin,
            RosterPlugin,
            ScenarioPlugin { config },
        ));
    app
}

/// Step the app until the scenario reports completion
pub fn step_until_complete(app: &mut App, max_duration_secs: f32) -> Result<ScenarioReport, String> {
    app.finish();
    app.cleanup();

    // Leave a second of slack past the scripted end
    let frame_limit = ((max_duration_secs as f64 + 1.0) / FRAME_SECS).ceil() as usize;
    for _ in 0..frame_limit {
        app.update();
        if app.world().resource::<ScenarioState>().complete {
            break;
        }
    }

    let world = app.world_mut();
    world.shutdown_time_coordinator();
    world
        .resource_mut::<ScenarioState>()
        .report
        .take()
        .ok_or_else(|| format!("Scenario did not finish within {} frames", frame_limit))
}

/// Run a scenario with the shipped gameplay config and unit definitions
pub fn run_scenario(config: ScenarioConfig) -> Result<ScenarioReport, String> {
    config.validate()?;

    println!("Starting headless scenario...");
    println!("  Roster: {:?}", config.roster);
    println!("  Battle assignments: {}", config.battle.len());
    println!("  Duration: {:.0}s", config.max_duration_secs);

    let gameplay = GameplayConfig::load_or_default();
    let definitions = load_unit_definitions(Path::new(UNITS_CONFIG_PATH))?;
    let max_duration = config.max_duration_secs;

    let mut app = build_scenario_app(config, gameplay, definitions);
    app.add_plugins(LogPlugin::default());
    step_until_complete(&mut app, max_duration)
}
