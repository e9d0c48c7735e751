//! # Engine Module
//!
//! The stochastic machinery of the proteoform redox simulator.
//!
//! ## Overview
//!
//! Given a read-only [`StateSpace`](crate::core::space::state_space::StateSpace),
//! the engine decides which single-site moves are legal, how likely they are, and
//! applies them to individual molecules one time step at a time. It owns no
//! population state itself; the [`workflows`](crate::workflows) layer drives it over
//! a whole population and records the results.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - `SimulationConfig`, its builder and the four
//!   `TransitionProbabilities`
//! - **Transition rules** ([`transition`]) - Hamming-distance-1 targets and the
//!   catalytic-site-dependent event probabilities
//! - **Stochastic update** ([`stochastic`]) - The per-molecule, per-step algorithm
//! - **Random streams** ([`streams`]) - One seeded generator per molecule
//! - **Trajectory storage** ([`trajectory`]) - Column-major N × (T+1) state table
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - `EngineError` over the core error taxonomy

pub mod config;
pub mod error;
pub mod progress;
pub mod stochastic;
pub mod streams;
pub mod trajectory;
pub mod transition;
pub(crate) mod utils;
