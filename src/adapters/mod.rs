//! Port implementations.
//!
//! `live` talks to the real world; `replaying` serves cassette recordings so
//! the pipeline can run deterministically in tests.

pub mod live;
pub mod replaying;
