use crate::AgentId;

/// Read-only world access.
///
/// The core crate does not prescribe which queries a world must expose;
/// subsystems (combat perception, movement, etc.) define extension traits.
pub trait WorldView {
    type Agent: AgentId;

    /// Monotonic world clock in seconds. Used to timestamp rolling histories.
    fn now_seconds(&self) -> f32;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}
