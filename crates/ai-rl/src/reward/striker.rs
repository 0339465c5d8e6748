use super::{
    bonus, covered_by_ally, distance_delta, forced_engagement, survival, throughput,
    RewardBreakdown, RewardContext,
};
use crate::action::CombatAction;
use crate::observation::Observation;

/// Hit and run: close in while the blade is ready, back off once it landed.
pub(super) fn breakdown(
    prev: &Observation,
    cur: &Observation,
    ctx: &RewardContext,
) -> RewardBreakdown {
    let delta = distance_delta(prev, cur);
    let engagement = if cur.beyond_max_range {
        forced_engagement(delta)
    } else if ctx.just_attacked {
        if delta > 0.0 {
            30.0 * delta
        } else {
            20.0 * delta
        }
    } else if ctx.can_attack && delta < 0.0 {
        -25.0 * delta
    } else {
        0.0
    };

    let strafing = matches!(
        ctx.last_action,
        CombatAction::StrafeLeft | CombatAction::StrafeRight
    );
    let positional = bonus(strafing, 0.5)
        + bonus(ctx.just_attacked && covered_by_ally(cur), 1.0)
        + bonus(ctx.dot_active && delta > 0.0, 1.0);

    RewardBreakdown {
        engagement,
        throughput: throughput(ctx.dps, ctx.previous_dps, 3.0),
        survival: survival(prev, cur, 10.0),
        positional,
    }
}
