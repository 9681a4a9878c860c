//! `peon-runtime` – Behavior loops and the robot facade
//!
//! Runs a fixed set of autonomous behaviors concurrently against one agent,
//! each on its own thread, coordinated through the `peon-kernel`
//! primitives.
//!
//! # Modules
//!
//! - [`robot`] – [`Robot`][robot::Robot]: starts the behavior threads and
//!   exposes enable/disable, settings, target accessors and one-shot
//!   behavior calls.
//! - [`behavior_loop`] – the per-behavior readiness, gate, lock, execute,
//!   sleep cycle, with error and panic containment.
//! - [`registry`] – lock set, interval and default settings per behavior,
//!   and the [`execute`][registry::execute] dispatch.
//! - [`params`] – typed parameters bound from stored settings.
//! - [`fall`], [`defend`], [`eat`], [`hunt`], [`gather`], [`armor`],
//!   [`storage`] – the behaviors themselves.
//! - [`config`] – [`RobotConfig`][config::RobotConfig] and
//!   [`Tuning`][config::Tuning].
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: installs
//!   the global `tracing` subscriber with an optional OTLP span exporter.

pub mod armor;
pub mod behavior_loop;
pub mod config;
pub mod context;
pub mod defend;
pub mod eat;
pub mod fall;
pub mod gather;
pub mod hunt;
pub mod params;
pub mod registry;
pub mod robot;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use config::{RobotConfig, Tuning};
pub use context::BehaviorContext;
pub use params::{
    DefendParams, EatParams, FallParams, GatherParams, HuntParams, Params, StoreParams,
};
pub use registry::{BehaviorDescriptor, Registry};
pub use robot::Robot;
pub use telemetry::{TracerProviderGuard, init_tracing};
