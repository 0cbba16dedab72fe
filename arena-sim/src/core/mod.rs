//! Core primitives shared by the simulation and the content generator.

pub mod rng;

pub use rng::SimRng;
