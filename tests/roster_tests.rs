//! Integration tests for the roster manager
//!
//! These tests verify that:
//! - Units land in the lowest free slot and capacity is never exceeded
//! - Battle slots hold independent copies of roster data
//! - Summon cost follows missing health and mana
//! - Every mutation produces exactly one change snapshot per touched slot
//! - Summoning spawns the battle roster with scaled vitals

use bevy::ecs::event::Events;
use bevy::ecs::world::CommandQueue;
use bevy::prelude::*;

use dreamward::roster::{
    BattleSlotChanged, RosterChange, RosterManager, RosterPlugin, SlotState, SummonCostRates,
    UnitSlotChanged,
};
use dreamward::units::{Health, Mana, SummonedBy, Unit, UnitDefinition, UnitDefinitions, UnitKind};

fn kind(id: &str) -> UnitKind {
    UnitKind::new(id)
}

fn create_roster() -> RosterManager {
    RosterManager::new(12, 4)
}

fn definition(name: &str, max_health: f32, max_mana: f32) -> UnitDefinition {
    UnitDefinition {
        name: name.to_string(),
        description: String::new(),
        max_health,
        max_mana,
        mana_regen: 0.0,
    }
}

fn test_definitions() -> UnitDefinitions {
    let mut definitions = UnitDefinitions::default();
    definitions.insert(kind("Swordsman"), definition("Swordsman", 150.0, 40.0));
    definitions.insert(kind("Archer"), definition("Archer", 90.0, 60.0));
    definitions
}

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// =============================================================================
// Roster slots
// =============================================================================

#[test]
fn test_add_unit_fills_lowest_empty_slot() {
    let mut roster = create_roster();

    assert!(roster.add_unit(kind("TypeA"), None));
    let first = roster.get_unit_slot(0);
    assert_eq!(first.unit_kind, Some(kind("TypeA")));
    assert_eq!(first.state, SlotState::Available);
    assert!(first.unlocked);

    assert!(roster.add_unit(kind("TypeB"), None));
    assert_eq!(roster.get_unit_slot(1).unit_kind, Some(kind("TypeB")));

    assert!(roster.remove_unit(0));
    assert!(roster.add_unit(kind("TypeC"), None));
    assert_eq!(roster.get_unit_slot(0).unit_kind, Some(kind("TypeC")));
}

#[test]
fn test_add_unit_at_explicit_index_overwrites() {
    let mut roster = create_roster();
    assert!(roster.add_unit(kind("Archer"), Some(7)));
    assert!(roster.add_unit(kind("Mage"), Some(7)));
    assert_eq!(roster.get_unit_slot(7).unit_kind, Some(kind("Mage")));
    assert!(roster.get_unit_slot(0).is_empty());
}

#[test]
fn test_add_unit_rejects_invalid_input() {
    let mut roster = create_roster();
    roster.take_changes();

    assert!(!roster.add_unit(kind(""), None));
    assert!(!roster.add_unit(kind("   "), None));
    assert!(!roster.add_unit(kind("Archer"), Some(12)));
    assert!(!roster.has_pending_changes());
    assert!(roster.all_units().iter().all(|slot| slot.is_empty()));
}

#[test]
fn test_capacity_is_never_exceeded() {
    for (total, battle) in [(0, 0), (1, 0), (3, 3), (12, 4)] {
        let mut roster = RosterManager::new(total, battle);
        for i in 0..total {
            assert!(roster.add_unit(kind(&format!("Unit{}", i)), None));
        }
        assert!(!roster.add_unit(kind("Overflow"), None));
        assert_eq!(
            roster.all_units().iter().filter(|slot| !slot.is_empty()).count(),
            total
        );
        assert!(!roster.set_battle_slot(battle, 0));
    }
}

#[test]
#[should_panic]
fn test_initialize_rejects_more_battle_slots_than_total() {
    RosterManager::new(2, 3);
}

#[test]
fn test_initialize_resets_everything() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);
    roster.set_battle_slot(0, 0);
    roster.unlock_slot(5);

    roster.initialize(6, 2);
    assert_eq!(roster.total_slots(), 6);
    assert_eq!(roster.battle_slot_count(), 2);
    assert_eq!(roster.reserve_slots(), 4);
    assert_eq!(roster.unlocked_slot_count(), 0);
    assert!(roster.get_battle_units().iter().all(|slot| slot.is_empty()));
    assert!(!roster.has_pending_changes());
}

#[test]
fn test_remove_empty_slot_fails_without_notification() {
    let mut roster = create_roster();
    roster.take_changes();

    assert!(!roster.remove_unit(5));
    assert!(!roster.remove_unit(99));
    assert!(!roster.has_pending_changes());
}

#[test]
fn test_remove_unit_resets_slot() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), Some(2));
    roster.update_unit_status(2, 0.3, 0.1);

    assert!(roster.remove_unit(2));
    let slot = roster.get_unit_slot(2);
    assert!(slot.is_empty());
    assert_eq!(slot.state, SlotState::Empty);
    assert_eq!(slot.health_fraction, 1.0);
    assert_eq!(slot.slot_index, Some(2));
}

#[test]
fn test_get_unit_slot_out_of_range_is_empty() {
    let roster = create_roster();
    let slot = roster.get_unit_slot(40);
    assert!(slot.is_empty());
    assert_eq!(slot.slot_index, None);
}

#[test]
fn test_available_units_exclude_empty_slots() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), Some(0));
    roster.add_unit(kind("Mage"), Some(3));
    roster.unlock_slot(6);

    let available = roster.get_available_units();
    assert_eq!(available.len(), 2);
    assert_eq!(available[0].unit_kind, Some(kind("Archer")));
    assert_eq!(available[1].unit_kind, Some(kind("Mage")));
}

#[test]
fn test_unlock_slot_notifies_every_time() {
    let mut roster = create_roster();
    roster.take_changes();

    assert!(roster.unlock_slot(4));
    assert!(roster.unlock_slot(4));
    assert!(!roster.unlock_slot(12));

    assert!(roster.get_unit_slot(4).unlocked);
    assert_eq!(roster.take_changes().len(), 2);
}

// =============================================================================
// Vitals
// =============================================================================

#[test]
fn test_update_unit_status_clamps_fractions() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);

    assert!(roster.update_unit_status(0, 1.7, -0.4));
    let slot = roster.get_unit_slot(0);
    assert_eq!(slot.health_fraction, 1.0);
    assert_eq!(slot.mana_fraction, 0.0);

    assert!(!roster.update_unit_status(12, 0.5, 0.5));
}

#[test]
fn test_update_unit_from_actor() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);

    let health = Health {
        current: 45.0,
        maximum: 90.0,
    };
    let mana = Mana {
        current: 15.0,
        maximum: 60.0,
        regen_rate: 0.0,
    };
    assert!(roster.update_unit_from_actor(0, &health, &mana));

    let slot = roster.get_unit_slot(0);
    assert!(approx_eq(slot.health_fraction, 0.5));
    assert!(approx_eq(slot.mana_fraction, 0.25));
}

#[test]
fn test_update_unit_from_actor_without_mana_pool() {
    let mut roster = create_roster();
    roster.add_unit(kind("Guardian"), None);

    let health = Health::full(220.0);
    let mana = Mana {
        current: 0.0,
        maximum: 0.0,
        regen_rate: 0.0,
    };
    assert!(roster.update_unit_from_actor(0, &health, &mana));
    assert_eq!(roster.get_unit_slot(0).mana_fraction, 0.0);
}

// =============================================================================
// Battle slots
// =============================================================================

#[test]
fn test_set_battle_slot_copies_and_marks_in_battle() {
    let mut roster = create_roster();
    roster.add_unit(kind("TypeA"), None);
    roster.add_unit(kind("TypeB"), None);

    assert!(roster.set_battle_slot(0, 1));
    let battle = &roster.get_battle_units()[0];
    assert_eq!(battle.unit_kind, Some(kind("TypeB")));
    assert_eq!(battle.state, SlotState::InBattle);
    assert_eq!(battle.slot_index, Some(1));

    // The roster slot itself stays available
    assert_eq!(roster.get_unit_slot(1).state, SlotState::Available);
}

#[test]
fn test_set_battle_slot_rejects_invalid_indices() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);
    roster.take_changes();

    assert!(!roster.set_battle_slot(4, 0));
    assert!(!roster.set_battle_slot(0, 12));
    assert!(!roster.has_pending_changes());
}

#[test]
fn test_set_battle_slot_from_empty_roster_slot() {
    let mut roster = create_roster();
    assert!(roster.set_battle_slot(2, 9));
    assert!(roster.get_battle_units()[2].is_empty());
    assert_eq!(roster.calculate_summon_cost(), 0.0);
}

#[test]
fn test_battle_copy_does_not_follow_roster_updates() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);
    roster.set_battle_slot(0, 0);

    roster.update_unit_status(0, 0.2, 0.2);
    assert_eq!(roster.get_battle_units()[0].health_fraction, 1.0);

    roster.set_battle_slot(0, 0);
    assert!(approx_eq(roster.get_battle_units()[0].health_fraction, 0.2));
}

#[test]
fn test_removed_unit_stays_in_battle_slot() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);
    roster.set_battle_slot(0, 0);

    roster.remove_unit(0);
    assert!(roster.get_unit_slot(0).is_empty());
    assert_eq!(roster.get_battle_units()[0].unit_kind, Some(kind("Archer")));
}

#[test]
fn test_clear_battle_slots() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);
    roster.set_battle_slot(0, 0);
    roster.set_battle_slot(1, 0);
    roster.take_changes();

    assert!(roster.clear_battle_slot(0));
    assert!(roster.get_battle_units()[0].is_empty());
    assert_eq!(roster.get_battle_units()[0].slot_index, None);
    assert!(!roster.clear_battle_slot(4));

    roster.clear_all_battle_slots();
    assert!(roster.get_battle_units().iter().all(|slot| slot.is_empty()));
    assert_eq!(roster.take_changes().len(), 1 + 4);
}

#[test]
fn test_swap_twice_restores_order() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);
    roster.add_unit(kind("Mage"), None);
    roster.set_battle_slot(0, 0);
    roster.set_battle_slot(3, 1);
    let original = roster.get_battle_units().to_vec();

    assert!(roster.swap_battle_slots(0, 3));
    assert_eq!(roster.get_battle_units()[0].unit_kind, Some(kind("Mage")));
    assert_eq!(roster.get_battle_units()[3].unit_kind, Some(kind("Archer")));

    assert!(roster.swap_battle_slots(0, 3));
    assert_eq!(roster.get_battle_units(), original.as_slice());
}

#[test]
fn test_swap_rejects_invalid_index() {
    let mut roster = create_roster();
    roster.take_changes();
    assert!(!roster.swap_battle_slots(0, 4));
    assert!(!roster.has_pending_changes());
}

#[test]
fn test_self_swap_notifies_twice() {
    let mut roster = create_roster();
    roster.take_changes();

    assert!(roster.swap_battle_slots(2, 2));
    let changes = roster.take_changes();
    assert_eq!(changes.len(), 2);
    assert!(changes
        .iter()
        .all(|change| matches!(change, RosterChange::BattleSlot { battle_index: 2, .. })));
}

// =============================================================================
// Summon cost
// =============================================================================

#[test]
fn test_summon_cost_for_full_units_is_zero() {
    let mut roster = create_roster();
    assert_eq!(roster.calculate_summon_cost(), 0.0);

    roster.add_unit(kind("TypeA"), None);
    roster.add_unit(kind("TypeB"), None);
    roster.set_battle_slot(0, 1);
    assert_eq!(roster.calculate_summon_cost(), 0.0);
}

#[test]
fn test_summon_cost_after_damage() {
    let mut roster = create_roster();
    roster.add_unit(kind("TypeA"), None);
    roster.add_unit(kind("TypeB"), None);
    roster.set_battle_slot(0, 1);

    roster.update_unit_status(1, 0.5, 0.5);
    roster.set_battle_slot(0, 1);

    assert!(approx_eq(roster.calculate_summon_cost(), 75.0));
    assert!(roster.can_summon_all(75.0));
    assert!(!roster.can_summon_all(74.9));
}

#[test]
fn test_summon_cost_uses_configured_rates() {
    let mut roster = create_roster().with_cost_rates(SummonCostRates {
        health_per_percent: 2.0,
        mana_per_percent: 0.0,
    });
    roster.add_unit(kind("Archer"), None);
    roster.update_unit_status(0, 0.75, 0.0);
    roster.set_battle_slot(0, 0);

    assert!(approx_eq(roster.calculate_summon_cost(), 50.0));
}

#[test]
fn test_summon_cost_grows_as_fractions_drop() {
    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);
    roster.add_unit(kind("Mage"), None);
    roster.set_battle_slot(1, 1);

    let mut previous = roster.calculate_summon_cost();
    for step in 1..=10 {
        let fraction = 1.0 - step as f32 * 0.1;
        roster.update_unit_status(0, fraction, 1.0);
        roster.set_battle_slot(0, 0);
        let cost = roster.calculate_summon_cost();
        assert!(cost >= previous, "cost dropped from {} to {} at health {}", previous, cost, fraction);
        previous = cost;
    }

    let mut previous = roster.calculate_summon_cost();
    for step in 1..=10 {
        let fraction = 1.0 - step as f32 * 0.1;
        roster.update_unit_status(0, 0.0, fraction);
        roster.set_battle_slot(0, 0);
        let cost = roster.calculate_summon_cost();
        assert!(cost >= previous);
        previous = cost;
    }
}

// =============================================================================
// Change snapshots
// =============================================================================

#[test]
fn test_changes_carry_slot_snapshots_in_order() {
    let mut roster = create_roster();
    roster.take_changes();

    roster.add_unit(kind("Archer"), None);
    roster.set_battle_slot(1, 0);
    roster.update_unit_status(0, 0.5, 1.0);

    let changes = roster.take_changes();
    assert_eq!(changes.len(), 3);
    match &changes[0] {
        RosterChange::UnitSlot { slot_index, slot } => {
            assert_eq!(*slot_index, 0);
            assert_eq!(slot.unit_kind, Some(kind("Archer")));
            assert_eq!(slot.health_fraction, 1.0);
        }
        other => panic!("expected a roster slot change, got {:?}", other),
    }
    match &changes[1] {
        RosterChange::BattleSlot { battle_index, slot } => {
            assert_eq!(*battle_index, 1);
            assert_eq!(slot.state, SlotState::InBattle);
        }
        other => panic!("expected a battle slot change, got {:?}", other),
    }
    match &changes[2] {
        RosterChange::UnitSlot { slot, .. } => assert_eq!(slot.health_fraction, 0.5),
        other => panic!("expected a roster slot change, got {:?}", other),
    }

    assert!(!roster.has_pending_changes());
}

// =============================================================================
// Summoning
// =============================================================================

fn summon(
    world: &mut World,
    roster: &mut RosterManager,
    definitions: &UnitDefinitions,
    positions: &[Vec3],
    owner: Entity,
) -> Vec<Entity> {
    let mut queue = CommandQueue::default();
    let spawned = {
        let mut commands = Commands::new(&mut queue, world);
        roster.summon_battle_units(&mut commands, definitions, positions, owner)
    };
    queue.apply(world);
    spawned
}

#[test]
fn test_summon_spawns_battle_units_with_scaled_vitals() {
    let mut world = World::new();
    let owner = world.spawn_empty().id();
    let definitions = test_definitions();

    let mut roster = create_roster();
    roster.add_unit(kind("Swordsman"), None);
    roster.add_unit(kind("Archer"), None);
    roster.update_unit_status(1, 0.5, 0.25);
    roster.set_battle_slot(0, 0);
    roster.set_battle_slot(2, 1);

    let positions = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)];
    let spawned = summon(&mut world, &mut roster, &definitions, &positions, owner);
    assert_eq!(spawned.len(), 2);
    assert_eq!(roster.summoned_units(), spawned.as_slice());

    let archer = spawned[1];
    assert_eq!(world.get::<Unit>(archer).unwrap().kind, kind("Archer"));
    assert_eq!(world.get::<Transform>(archer).unwrap().translation, positions[2]);
    let health = world.get::<Health>(archer).unwrap();
    assert!(approx_eq(health.current, 45.0));
    assert_eq!(health.maximum, 90.0);
    assert!(approx_eq(world.get::<Mana>(archer).unwrap().current, 15.0));
    assert_eq!(
        world.get::<SummonedBy>(archer),
        Some(&SummonedBy {
            owner,
            battle_index: 2
        })
    );
}

#[test]
fn test_summon_falls_back_to_origin() {
    let mut world = World::new();
    let owner = world.spawn_empty().id();

    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);
    roster.set_battle_slot(3, 0);

    let spawned = summon(&mut world, &mut roster, &test_definitions(), &[Vec3::ONE], owner);
    assert_eq!(spawned.len(), 1);
    assert_eq!(world.get::<Transform>(spawned[0]).unwrap().translation, Vec3::ZERO);
}

#[test]
fn test_summon_skips_unknown_kinds() {
    let mut world = World::new();
    let owner = world.spawn_empty().id();

    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);
    roster.add_unit(kind("Dragon"), None);
    roster.set_battle_slot(0, 1);
    roster.set_battle_slot(1, 0);

    let spawned = summon(&mut world, &mut roster, &test_definitions(), &[], owner);
    assert_eq!(spawned.len(), 1);
    assert_eq!(world.get::<Unit>(spawned[0]).unwrap().kind, kind("Archer"));
}

#[test]
fn test_prune_summoned_units() {
    let mut world = World::new();
    let owner = world.spawn_empty().id();

    let mut roster = create_roster();
    roster.add_unit(kind("Archer"), None);
    roster.add_unit(kind("Swordsman"), None);
    roster.set_battle_slot(0, 0);
    roster.set_battle_slot(1, 1);
    let spawned = summon(&mut world, &mut roster, &test_definitions(), &[], owner);

    world.despawn(spawned[0]);
    let dropped = roster.prune_summoned_units(|entity| world.entities().contains(entity));
    assert_eq!(dropped, 1);
    assert_eq!(roster.summoned_units(), &[spawned[1]]);
}

// =============================================================================
// Plugin
// =============================================================================

#[test]
fn test_plugin_publishes_changes_as_events() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, RosterPlugin));

    let mut roster = create_roster();
    roster.take_changes();
    roster.add_unit(kind("Archer"), None);
    roster.set_battle_slot(0, 0);
    let owner = app.world_mut().spawn(roster).id();

    app.update();

    let unit_events: Vec<UnitSlotChanged> = app
        .world_mut()
        .resource_mut::<Events<UnitSlotChanged>>()
        .drain()
        .collect();
    assert_eq!(unit_events.len(), 1);
    assert_eq!(unit_events[0].owner, owner);
    assert_eq!(unit_events[0].slot_index, 0);

    let battle_events: Vec<BattleSlotChanged> = app
        .world_mut()
        .resource_mut::<Events<BattleSlotChanged>>()
        .drain()
        .collect();
    assert_eq!(battle_events.len(), 1);
    assert_eq!(battle_events[0].battle_index, 0);
    assert_eq!(battle_events[0].slot.unit_kind, Some(kind("Archer")));

    assert!(!app.world().get::<RosterManager>(owner).unwrap().has_pending_changes());
}
