//! Decision trace primitives for deterministic game AI.
//!
//! Engine-agnostic and lightweight. Debug overlays and inspectors belong in
//! adapter crates that consume `TraceEvent`s.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    NullTraceSink, TraceEvent, TraceLog, TraceRecorder, TraceSink, TracingSink, VecTraceSink,
};
