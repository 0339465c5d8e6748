use core::fmt::Debug;

/// Stable identifier for an agent handle.
///
/// Deterministic simulation requires:
/// - stable ordering (`Ord`)
/// - a stable numeric ID (`stable_id`) for seeding, traces and logs
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Sort agents into the order a deterministic scheduler must step them in.
pub fn sort_by_stable_id<A: AgentId>(agents: &mut [A]) {
    agents.sort_by_key(|a| a.stable_id());
}
