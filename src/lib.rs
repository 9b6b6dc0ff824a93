//! Steering behaviors for 2D agents: seek, flee, arrive, face, pursuit, evade and wander.
//!
//! Behaviors only compute a desired `SteeringOutput`; integrating it into motion is left
//! to the caller. `SteeringPlugin` wires them into a Bevy app.

pub mod config;
pub mod movement;
pub mod plugin;
pub mod prelude;
