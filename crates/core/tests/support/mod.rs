//! Shared test helpers for `ticktally-core` integration tests.
//!
//! In-memory port implementations plus fixtures so scenario tests can focus
//! on behaviour instead of wiring.

#![allow(dead_code)]

pub mod fixtures;
pub mod stores;
