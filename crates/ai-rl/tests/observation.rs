mod common;

use ai_core::Vec2;
use ai_rl::{perceive, AllySlot, Archetype, CombatClock, Observation};
use common::{approx, SandboxWorld, PLAYER};

const ME: u64 = 10;

fn kiter_world() -> SandboxWorld {
    let mut world = SandboxWorld::with_player(Vec2::new(0.0, 0.0));
    world.add_elite(ME, Archetype::Kiter, Vec2::new(1000.0, 0.0));
    world
}

#[test]
fn distance_is_normalized_by_own_range_and_clamped() {
    let mut world = kiter_world();
    let stats = Archetype::Kiter.default_stats();
    let clock = CombatClock::default();

    let p = perceive(&world, ME, &stats, &clock);
    assert!(approx(p.observation.distance_to_target, 0.5));
    assert!(!p.observation.beyond_max_range);
    assert_eq!(p.observation.target_health, 1.0);
    assert_eq!(p.observation.self_health, 1.0);
    assert!(p.observation.line_of_sight);

    world.place(ME, Vec2::new(5000.0, 0.0));
    world.los_blocked = true;
    let p = perceive(&world, ME, &stats, &clock);
    assert_eq!(p.observation.distance_to_target, 1.0);
    assert!(p.observation.beyond_max_range);
    assert!(!p.observation.line_of_sight);
    assert!(approx(p.target.expect("target").distance, 5000.0));
}

#[test]
fn allies_are_the_three_closest_living_decision_makers() {
    let mut world = kiter_world();
    world.add_elite(20, Archetype::Tank, Vec2::new(1400.0, 0.0));
    world.add_elite(21, Archetype::Support, Vec2::new(1100.0, 0.0));
    world.add_elite(22, Archetype::Striker, Vec2::new(1800.0, 0.0));
    world.add_elite(23, Archetype::Bruiser, Vec2::new(1050.0, 0.0));
    world.add_elite(24, Archetype::Bruiser, Vec2::new(1200.0, 0.0));
    world.body_mut(23).health = 0.0;
    world.body_mut(24).driven = false;
    world.body_mut(21).health = 50.0;

    let stats = Archetype::Kiter.default_stats();
    let p = perceive(&world, ME, &stats, &CombatClock::default());

    let ids: Vec<u64> = p.allies.iter().map(|a| a.agent).collect();
    assert_eq!(ids, vec![21, 20, 22]);

    let slots = p.observation.allies;
    assert!(approx(slots[0].health, 0.5));
    assert!(approx(slots[0].distance, 100.0 / 2000.0));
    assert!(approx(slots[1].distance, 400.0 / 2000.0));
    assert!(approx(slots[2].distance, 800.0 / 2000.0));
    // The dead and inert bodies do not count towards the squad either.
    assert!(approx(p.observation.nearby_allies, 3.0 / 5.0));
}

#[test]
fn missing_ally_slots_read_as_absent_and_far() {
    let world = kiter_world();
    let p = perceive(
        &world,
        ME,
        &Archetype::Kiter.default_stats(),
        &CombatClock::default(),
    );
    assert_eq!(p.observation.allies, [AllySlot::EMPTY; 3]);
    assert_eq!(p.observation.nearby_allies, 0.0);
    assert_eq!(p.observation.mean_ally_health(), None);
}

#[test]
fn mean_ally_health_skips_empty_slots() {
    let mut observation = Observation::default();
    observation.allies[0] = AllySlot {
        health: 0.25,
        distance: 0.1,
    };
    observation.allies[1] = AllySlot {
        health: 0.75,
        distance: 0.3,
    };
    let mean = observation.mean_ally_health().expect("two allies");
    assert!(approx(mean, 0.5));

    observation.allies[0] = AllySlot::EMPTY;
    assert_eq!(observation.mean_ally_health(), Some(0.75));
}

#[test]
fn no_target_yields_the_default_observation() {
    let mut world = kiter_world();
    world.body_mut(ME).target = None;
    let p = perceive(
        &world,
        ME,
        &Archetype::Kiter.default_stats(),
        &CombatClock::default(),
    );
    assert_eq!(p.observation, Observation::default());
    assert!(p.target.is_none());

    world.bodies.remove(&PLAYER);
    world.body_mut(ME).target = Some(PLAYER);
    let p = perceive(
        &world,
        ME,
        &Archetype::Kiter.default_stats(),
        &CombatClock::default(),
    );
    assert!(p.target.is_none());
}

#[test]
fn clock_drives_attack_timer_and_recent_damage() {
    let world = kiter_world();
    let stats = Archetype::Kiter.default_stats();

    let mut clock = CombatClock::default();
    let p = perceive(&world, ME, &stats, &clock);
    assert!(!p.observation.took_damage_recently);
    assert_eq!(p.observation.time_since_last_attack, 0.0);

    clock.since_damage_taken = 0.0;
    clock.advance(2.5);
    let p = perceive(&world, ME, &stats, &clock);
    assert!(approx(p.observation.time_since_last_attack, 0.5));
    assert!(!p.observation.took_damage_recently);

    clock.advance(10.0);
    clock.since_damage_taken = 0.25;
    let p = perceive(&world, ME, &stats, &clock);
    assert_eq!(p.observation.time_since_last_attack, 1.0);
    assert!(p.observation.took_damage_recently);
}
