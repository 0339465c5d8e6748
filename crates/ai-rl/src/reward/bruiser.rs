use super::{bonus, survival, throughput, RewardBreakdown, RewardContext, STALL_PENALTY};
use crate::observation::Observation;

// Raw world units: normalized distance saturates at 1.0 beyond range, which
// would hide a slow walker's approach.
const BEYOND_RANGE_PER_UNIT: f32 = 0.05;
const CLOSING_PER_UNIT: f32 = 0.015;
const RETREAT_PER_UNIT: f32 = 0.01;

pub(super) fn breakdown(
    prev: &Observation,
    cur: &Observation,
    ctx: &RewardContext,
) -> RewardBreakdown {
    let delta = ctx.target_distance_units - ctx.previous_target_distance_units;
    let engagement = if cur.beyond_max_range {
        if delta < 0.0 {
            BEYOND_RANGE_PER_UNIT * -delta
        } else if delta > 0.0 {
            -BEYOND_RANGE_PER_UNIT * delta
        } else {
            STALL_PENALTY
        }
    } else if delta < 0.0 {
        -CLOSING_PER_UNIT * delta
    } else {
        -RETREAT_PER_UNIT * delta
    };

    let ally = cur.closest_ally();
    let holding_front =
        cur.nearby_allies > 0.2 && ally.is_occupied() && ally.distance > cur.distance_to_target;
    let positional = cur.self_health
        + bonus(cur.distance_to_target < 0.3, 3.0)
        + bonus(cur.took_damage_recently, 2.0)
        + bonus(cur.line_of_sight, 1.0)
        + bonus(holding_front, 2.0);

    RewardBreakdown {
        engagement,
        throughput: throughput(ctx.dps, ctx.previous_dps, 2.0),
        survival: survival(prev, cur, 15.0),
        positional,
    }
}
