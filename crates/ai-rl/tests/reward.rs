mod common;

use ai_rl::{
    reward_breakdown, shaped_reward, AllySlot, Archetype, CombatAction, GuardGeometry,
    Observation, RewardContext,
};
use common::{approx, obs_at};

fn ctx() -> RewardContext {
    RewardContext {
        last_action: CombatAction::MoveTowardTarget,
        ..RewardContext::default()
    }
}

#[test]
fn kiter_is_penalized_for_closing_in_range() {
    let prev = obs_at(0.95, false);
    let cur = obs_at(0.80, false);
    let r = reward_breakdown(Archetype::Kiter, &prev, &cur, Some(&ctx()));
    assert!(r.engagement < 0.0);
    assert!(approx(r.engagement, -2.25), "{}", r.engagement);
}

#[test]
fn forced_engagement_overrides_kiting_beyond_range() {
    let prev = obs_at(0.95, true);
    let cur = obs_at(0.80, true);
    let r = reward_breakdown(Archetype::Kiter, &prev, &cur, Some(&ctx()));
    assert!(approx(r.engagement, 7.5), "{}", r.engagement);

    // Drifting further away is punished just as hard.
    let r = reward_breakdown(Archetype::Kiter, &cur, &prev, Some(&ctx()));
    assert!(approx(r.engagement, -7.5), "{}", r.engagement);
}

#[test]
fn standing_still_out_of_range_costs_a_flat_penalty() {
    let far = obs_at(1.0, true);
    for archetype in [Archetype::Kiter, Archetype::Striker, Archetype::Tank] {
        let r = reward_breakdown(archetype, &far, &far, Some(&ctx()));
        assert!(approx(r.engagement, -5.0), "{archetype}");
    }
}

#[test]
fn missing_context_scores_zero() {
    let prev = obs_at(0.2, false);
    let cur = obs_at(0.9, true);
    for archetype in Archetype::ALL {
        assert_eq!(shaped_reward(archetype, &prev, &cur, None), 0.0);
    }
}

#[test]
fn throughput_rewards_output_and_its_growth() {
    let obs = obs_at(0.5, false);
    let ctx = RewardContext {
        dps: 10.0,
        previous_dps: 4.0,
        ..ctx()
    };
    let r = reward_breakdown(Archetype::Kiter, &obs, &obs, Some(&ctx));
    assert!(approx(r.throughput, 10.0 * 2.0 + 6.0 * 5.0));
}

#[test]
fn survival_tracks_health_change() {
    let prev = obs_at(0.5, false);
    let cur = Observation {
        self_health: 0.8,
        ..prev
    };
    let support = reward_breakdown(Archetype::Support, &cur, &prev, Some(&ctx()));
    assert!(approx(support.survival, -0.2 * 12.0));
    let bruiser = reward_breakdown(Archetype::Bruiser, &cur, &prev, Some(&ctx()));
    assert!(approx(bruiser.survival, -0.2 * 15.0));
}

#[test]
fn striker_retreats_after_landing_and_while_poison_ticks() {
    let prev = obs_at(0.3, false);
    let cur = obs_at(0.5, false);
    let hit_and_run = RewardContext {
        just_attacked: true,
        dot_active: true,
        can_attack: false,
        ..ctx()
    };
    let r = reward_breakdown(Archetype::Striker, &prev, &cur, Some(&hit_and_run));
    assert!(approx(r.engagement, 30.0 * 0.2));
    assert!(approx(r.positional, 1.0));

    let ready = RewardContext {
        just_attacked: false,
        can_attack: true,
        ..ctx()
    };
    let r = reward_breakdown(Archetype::Striker, &cur, &prev, Some(&ready));
    assert!(approx(r.engagement, 25.0 * 0.2));
}

#[test]
fn tank_is_paid_for_standing_between_target_and_ward() {
    let obs = obs_at(0.6, false);
    let interposed = RewardContext {
        guard: Some(GuardGeometry {
            self_to_ward: 200.0,
            target_to_ward: 600.0,
            self_to_target: 400.0,
        }),
        ..ctx()
    };
    let r = reward_breakdown(Archetype::Tank, &obs, &obs, Some(&interposed));
    assert!(approx(r.positional, 10.0));

    let nearby = RewardContext {
        guard: Some(GuardGeometry {
            self_to_ward: 500.0,
            target_to_ward: 300.0,
            self_to_target: 700.0,
        }),
        ..ctx()
    };
    let r = reward_breakdown(Archetype::Tank, &obs, &obs, Some(&nearby));
    assert!(approx(r.positional, 3.0));

    let r = reward_breakdown(Archetype::Tank, &obs, &obs, Some(&ctx()));
    assert!(approx(r.positional, 0.0));
}

#[test]
fn support_is_drawn_to_wounded_allies() {
    let obs = Observation {
        allies: [
            AllySlot {
                health: 0.4,
                distance: 0.1,
            },
            AllySlot {
                health: 0.6,
                distance: 0.3,
            },
            AllySlot::EMPTY,
        ],
        nearby_allies: 0.4,
        ..obs_at(0.5, false)
    };
    let r = reward_breakdown(Archetype::Support, &obs, &obs, Some(&ctx()));
    // Wounded team (+2) and an ally closer than the target (+1.5).
    assert!(approx(r.positional, 3.5), "{}", r.positional);
}

#[test]
fn support_hangs_back_beyond_range_when_the_team_is_close() {
    let prev = obs_at(1.0, true);
    let close_team = Observation {
        allies: [
            AllySlot {
                health: 1.0,
                distance: 0.2,
            },
            AllySlot::EMPTY,
            AllySlot::EMPTY,
        ],
        ..prev
    };
    let r = reward_breakdown(Archetype::Support, &close_team, &close_team, Some(&ctx()));
    assert_eq!(r.engagement, 0.0);

    let r = reward_breakdown(Archetype::Support, &prev, &prev, Some(&ctx()));
    assert!(approx(r.engagement, -5.0));
}

#[test]
fn bruiser_sees_approach_in_world_units_beyond_range() {
    let far = obs_at(1.0, true);
    let walking = RewardContext {
        previous_target_distance_units: 1500.0,
        target_distance_units: 1400.0,
        ..ctx()
    };
    let r = reward_breakdown(Archetype::Bruiser, &far, &far, Some(&walking));
    assert!(approx(r.engagement, 5.0));

    let in_range = obs_at(0.5, false);
    let closing = RewardContext {
        previous_target_distance_units: 400.0,
        target_distance_units: 300.0,
        ..ctx()
    };
    let r = reward_breakdown(Archetype::Bruiser, &in_range, &in_range, Some(&closing));
    assert!(approx(r.engagement, 1.5));
}
