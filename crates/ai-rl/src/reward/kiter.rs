use super::{
    bonus, covered_by_ally, distance_delta, forced_engagement, survival, throughput,
    RewardBreakdown, RewardContext,
};
use crate::observation::Observation;

pub(super) fn breakdown(
    prev: &Observation,
    cur: &Observation,
    ctx: &RewardContext,
) -> RewardBreakdown {
    let delta = distance_delta(prev, cur);
    let engagement = if cur.beyond_max_range {
        forced_engagement(delta)
    } else if delta > 0.0 {
        20.0 * delta
    } else {
        // Closing in is penalized, slightly less than kiting is rewarded.
        15.0 * delta
    };

    RewardBreakdown {
        engagement,
        throughput: throughput(ctx.dps, ctx.previous_dps, 2.0),
        survival: survival(prev, cur, 10.0),
        positional: bonus(cur.line_of_sight, 0.5) + bonus(covered_by_ally(cur), 1.0),
    }
}
