use super::{
    bonus, distance_delta, forced_engagement, survival, throughput, RewardBreakdown,
    RewardContext,
};
use crate::observation::Observation;

/// Within this many units of the ward the tank still earns a partial bonus.
const WARD_LEASH: f32 = 800.0;

pub(super) fn breakdown(
    prev: &Observation,
    cur: &Observation,
    ctx: &RewardContext,
) -> RewardBreakdown {
    let delta = distance_delta(prev, cur);
    let engagement = if cur.beyond_max_range {
        forced_engagement(delta)
    } else if delta < 0.0 {
        -10.0 * delta
    } else {
        0.0
    };

    let guard = match ctx.guard {
        Some(g) if g.is_interposed() => 10.0,
        Some(g) if g.self_to_ward < WARD_LEASH => 3.0,
        _ => 0.0,
    };
    let positional = guard
        + cur.nearby_allies
        + bonus(cur.distance_to_target < 0.4, 2.0)
        + bonus(cur.took_damage_recently, 1.0);

    RewardBreakdown {
        engagement,
        throughput: throughput(ctx.dps, ctx.previous_dps, 1.5),
        survival: survival(prev, cur, 10.0),
        positional,
    }
}
