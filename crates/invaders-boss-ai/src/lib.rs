//! Boss behavior for the invaders simulation.
//!
//! Pure functions that compute state transitions, hit/shield arithmetic,
//! bounded bounce motion, and attack-pattern geometry for boss entities.
//! No ECS dependency — operates on plain data.

pub mod fsm;
pub mod profiles;
