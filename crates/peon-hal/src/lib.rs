//! `peon-hal` – Capability layer
//!
//! The traits the behaviors drive and an in-process simulation of them.
//!
//! # Modules
//!
//! - [`agent`] – [`Agent`][agent::Agent]: observed state plus movement,
//!   inventory and interaction primitives, and the state condition wait.
//! - [`world`] – [`World`][world::World]: block queries and path planning.
//! - [`sim`] – [`SimWorld`][sim::SimWorld]: deterministic simulation of
//!   both traits that records every issued command.

pub mod agent;
pub mod sim;
pub mod world;

pub use agent::{Agent, AgentStatus};
pub use sim::{CHEST_SLOTS, SimCommand, SimWorld, SimWorldBuilder};
pub use world::{MIN_BUILD_HEIGHT, World};
