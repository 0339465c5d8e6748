#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use ai_core::AgentId;

/// A small, allocation-friendly decision trace event.
///
/// Plain data so it can be recorded during simulation and rendered later by
/// tooling. `code` carries a discrete payload (an action index, a target id),
/// `value` a continuous one (a reward, a Q-value, an amount).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub agent: u64,
    pub tag: Cow<'static, str>,
    pub code: u64,
    pub value: f32,
}

impl TraceEvent {
    pub fn new(tick: u64, agent: impl AgentId, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            agent: agent.stable_id(),
            tag: tag.into(),
            code: 0,
            value: 0.0,
        }
    }

    pub fn with_code(mut self, code: u64) -> Self {
        self.code = code;
        self
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Forwards every event to the `tracing` facade at TRACE level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn emit(&mut self, event: TraceEvent) {
        tracing::trace!(
            tick = event.tick,
            agent = event.agent,
            tag = %event.tag,
            code = event.code,
            value = event.value,
            "decision trace"
        );
    }
}

#[derive(Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.tag == tag)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Opt-in recording target owned by whoever emits: an in-memory log, a
/// streaming sink, both, or neither.
#[derive(Default)]
pub struct TraceRecorder {
    log: Option<TraceLog>,
    sink: Option<Box<dyn TraceSink>>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_log(&mut self) {
        if self.log.is_none() {
            self.log = Some(TraceLog::default());
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    pub fn log(&self) -> Option<&TraceLog> {
        self.log.as_ref()
    }

    pub fn take_log(&mut self) -> Option<TraceLog> {
        self.log.as_mut().map(std::mem::take)
    }

    pub fn is_enabled(&self) -> bool {
        self.log.is_some() || self.sink.is_some()
    }

    pub fn emit(&mut self, event: TraceEvent) {
        if let Some(log) = self.log.as_mut() {
            log.push(event.clone());
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(event);
        }
    }
}

impl std::fmt::Debug for TraceRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceRecorder")
            .field("log", &self.log.as_ref().map(|l| l.events.len()))
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
