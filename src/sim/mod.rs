//! Session state and the per-tick pipeline.

pub mod clock;
pub mod event;
pub mod level;
pub mod rng;
pub mod schedule;
pub mod step;
pub mod world;
