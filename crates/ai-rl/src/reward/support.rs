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
        // Hanging back is fine as long as the team is still within reach.
        if cur.closest_ally().distance >= 0.5 {
            forced_engagement(delta)
        } else {
            0.0
        }
    } else if delta > 0.0 {
        20.0 * delta
    } else {
        -15.0 * delta.abs()
    };

    let throughput = throughput(ctx.hps, ctx.previous_hps, 3.0)
        + throughput(ctx.dps, ctx.previous_dps, 1.0);

    let wounded_team = cur
        .mean_ally_health()
        .is_some_and(|h| h < 0.7 && cur.nearby_allies > 0.2);
    let positional = bonus(cur.distance_to_target > 0.7, 2.0)
        + bonus(cur.distance_to_target < 0.3, -3.0)
        + bonus(wounded_team, 2.0)
        + bonus(covered_by_ally(cur), 1.5)
        + bonus(cur.took_damage_recently, -1.0);

    RewardBreakdown {
        engagement,
        throughput,
        survival: survival(prev, cur, 12.0),
        positional,
    }
}
