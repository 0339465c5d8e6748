mod common;

use ai_core::SplitMix64;
use ai_rl::{
    AllySlot, CombatAction, Exploration, Feature, FeatureVector, Observation, QLearningBrain,
    WeightTable,
};
use ai_rl::weights::WEIGHT_LIMIT;
use common::{approx, obs_at};

fn engaged_obs() -> Observation {
    Observation {
        distance_to_target: 0.4,
        self_health: 0.8,
        time_since_last_attack: 0.6,
        target_health: 1.0,
        line_of_sight: true,
        allies: [
            AllySlot {
                health: 0.5,
                distance: 0.2,
            },
            AllySlot::EMPTY,
            AllySlot::EMPTY,
        ],
        nearby_allies: 0.2,
        ..Observation::default()
    }
}

#[test]
fn greedy_selection_is_a_pure_function_of_state() {
    let mut rng = SplitMix64::new(7);
    let brain = QLearningBrain::fresh(&mut rng);
    let obs = engaged_obs();

    let first = brain.select_action(&obs, 0.0, &mut rng);
    assert!(!first.explored);
    for _ in 0..200 {
        let again = brain.select_action(&obs, 0.0, &mut rng);
        assert_eq!(again.action, first.action);
        assert_eq!(again.q, first.q);
    }
}

#[test]
fn exploration_rate_matches_epsilon_times_five_sixths() {
    let mut rng = SplitMix64::new(0xdecaf);
    let brain = QLearningBrain::fresh(&mut rng);
    let obs = engaged_obs();
    let (greedy, _) = brain.greedy_action(&obs);

    let epsilon = 0.3;
    let n = 60_000;
    let differing = (0..n)
        .filter(|_| brain.select_action(&obs, epsilon, &mut rng).action != greedy)
        .count();

    let rate = differing as f32 / n as f32;
    let expected = epsilon * 5.0 / 6.0;
    assert!(
        (rate - expected).abs() < 0.01,
        "rate {rate} expected {expected}"
    );
}

#[test]
fn ties_resolve_to_the_first_action_in_enumeration_order() {
    let brain = QLearningBrain::new(WeightTable::new());
    assert_eq!(
        brain.greedy_action(&engaged_obs()).0,
        CombatAction::MoveTowardTarget
    );

    let mut table = WeightTable::new();
    table.set(CombatAction::SecondaryAttack, Feature::TargetHealth, 2.0);
    table.set(CombatAction::StrafeLeft, Feature::TargetHealth, 2.0);
    table.set(CombatAction::PrimaryAttack, Feature::TargetHealth, 2.0);
    let brain = QLearningBrain::new(table);
    assert_eq!(brain.greedy_action(&engaged_obs()).0, CombatAction::StrafeLeft);
}

#[test]
fn negative_q_values_still_pick_the_maximum() {
    let mut table = WeightTable::new();
    for action in CombatAction::ALL {
        table.set(action, Feature::TargetHealth, -5.0);
    }
    table.set(CombatAction::StrafeRight, Feature::TargetHealth, -1.0);
    let brain = QLearningBrain::new(table);
    let (action, q) = brain.greedy_action(&engaged_obs());
    assert_eq!(action, CombatAction::StrafeRight);
    assert!(approx(q, -1.0));
}

#[test]
fn td_update_matches_the_closed_form() {
    let mut table = WeightTable::new();
    table.set(CombatAction::PrimaryAttack, Feature::DistanceToTarget, 0.3);
    table.set(CombatAction::PrimaryAttack, Feature::SelfHealth, -0.2);
    table.set(CombatAction::MoveTowardTarget, Feature::SelfHealth, 0.7);
    table.set(CombatAction::StrafeLeft, Feature::TargetHealth, 0.4);
    let mut brain = QLearningBrain::new(table.clone());

    let s = engaged_obs();
    let s_next = obs_at(0.9, false);
    let (alpha, gamma, reward) = (0.5_f32, 0.95_f32, 2.0_f32);
    let action = CombatAction::PrimaryAttack;

    let x = FeatureVector::from(&s);
    let q_old = table.q_value(action, &x);
    let max_next = CombatAction::ALL
        .iter()
        .map(|&a| table.q_value(a, &FeatureVector::from(&s_next)))
        .fold(f32::MIN, f32::max);
    let error = reward + gamma * max_next - q_old;

    let td = brain.update(&s, action, reward, &s_next, alpha, gamma);
    assert!(approx(td.q_old, q_old));
    assert!(approx(td.td_error, error));

    for feature in Feature::ALL {
        let expected = table.get(action, feature) + alpha * error * x.get(feature);
        assert!(
            approx(brain.weights().get(action, feature), expected),
            "{feature}"
        );
    }
    // Other rows are untouched.
    for other in CombatAction::ALL.into_iter().filter(|&a| a != action) {
        for feature in Feature::ALL {
            assert_eq!(brain.weights().get(other, feature), table.get(other, feature));
        }
    }
}

#[test]
fn non_finite_error_leaves_weights_alone() {
    let mut brain = QLearningBrain::new(WeightTable::new());
    let before = brain.weights().clone();
    let s = engaged_obs();
    brain.update(&s, CombatAction::StrafeLeft, f32::NAN, &s, 0.5, 0.95);
    assert_eq!(brain.weights(), &before);
}

#[test]
fn step_that_would_overflow_a_weight_is_refused() {
    let mut table = WeightTable::new();
    table.set(CombatAction::StrafeLeft, Feature::SelfHealth, 3.0e38);
    table.set(CombatAction::StrafeLeft, Feature::TargetHealth, -3.0e38);
    let mut brain = QLearningBrain::new(table.clone());
    let s = obs_at(0.5, false);

    let td = brain.update(&s, CombatAction::StrafeLeft, 3.0e38, &s, 1.0, 0.0);
    assert!(td.td_error.is_finite());
    assert_eq!(brain.weights(), &table);
}

#[test]
fn learned_weights_are_clamped() {
    let mut brain = QLearningBrain::new(WeightTable::new());
    let s = obs_at(0.5, false);

    brain.update(&s, CombatAction::PrimaryAttack, 1.0e9, &s, 1.0, 0.0);
    let w = brain.weights();
    assert_eq!(w.get(CombatAction::PrimaryAttack, Feature::SelfHealth), WEIGHT_LIMIT);
    assert_eq!(w.get(CombatAction::PrimaryAttack, Feature::TargetHealth), WEIGHT_LIMIT);
    assert_eq!(w.get(CombatAction::PrimaryAttack, Feature::LineOfSight), 0.0);

    brain.update(&s, CombatAction::PrimaryAttack, -1.0e9, &s, 1.0, 0.0);
    assert_eq!(
        brain.weights().get(CombatAction::PrimaryAttack, Feature::SelfHealth),
        -WEIGHT_LIMIT
    );
}

#[test]
fn priors_pull_an_untrained_agent_back_into_range() {
    let far = Observation {
        distance_to_target: 1.0,
        beyond_max_range: true,
        self_health: 1.0,
        time_since_last_attack: 1.0,
        target_health: 1.0,
        line_of_sight: true,
        ..Observation::default()
    };
    for seed in 0..32 {
        let brain = QLearningBrain::fresh(&mut SplitMix64::new(seed));
        assert_eq!(
            brain.greedy_action(&far).0,
            CombatAction::MoveTowardTarget,
            "seed {seed}"
        );
    }
}

#[test]
fn fresh_weights_stay_within_noise_of_the_priors() {
    let table = WeightTable::seeded(&mut SplitMix64::new(3));
    let noise = table.get(CombatAction::MoveAwayFromTarget, Feature::SelfHealth);
    assert!((-0.1..0.1).contains(&noise));
    let biased = table.get(CombatAction::MoveTowardTarget, Feature::BeyondMaxRange);
    assert!((0.9..1.1).contains(&biased));
    let never_out_of_range = table.get(CombatAction::PrimaryAttack, Feature::BeyondMaxRange);
    assert!(never_out_of_range < -0.6);
}

#[test]
fn epsilon_decays_linearly_to_the_floor() {
    let mut exploration = Exploration::new(0.2, 0.01, 0.05);
    exploration.decay(5.0);
    assert!(approx(exploration.epsilon, 0.15));
    exploration.decay(100.0);
    assert!(approx(exploration.epsilon, 0.05));

    let mut fixed = Exploration::new(0.2, 0.0, 0.01);
    fixed.decay(1000.0);
    assert!(approx(fixed.epsilon, 0.2));
}
