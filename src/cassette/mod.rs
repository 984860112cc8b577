//! Cassettes: YAML recordings of port interactions for deterministic replay.

pub mod format;
pub mod recorder;
pub mod replayer;
