//! `peon-kernel` – Concurrency primitives for the behavior loops
//!
//! The kernel does not decide what the agent does; it decides when a
//! behavior may run and what it may touch while it runs.
//!
//! # Modules
//!
//! - [`resource_lock`] – [`ResourceLocks`][resource_lock::ResourceLocks]:
//!   one lock per physical resource, acquired as an ordered composite so
//!   behaviors with overlapping resource sets never deadlock.
//! - [`gate`] – [`GateSet`][gate::GateSet]: level-triggered enable/disable
//!   switch per behavior.
//! - [`settings`] – [`SettingsStore`][settings::SettingsStore]: atomic
//!   per-behavior call arguments, read fresh each cycle.
//! - [`overlay`] – [`TargetOverlay`][overlay::TargetOverlay]: scoped,
//!   reference-counted additions to the defend target set.
//! - [`monitor`] – [`LoopMonitor`][monitor::LoopMonitor]: per-loop state,
//!   run counters and stalled-run detection.

pub mod gate;
pub mod monitor;
pub mod overlay;
pub mod resource_lock;
pub mod settings;

pub use gate::{Gate, GateSet};
pub use monitor::{LoopMonitor, LoopRecord, LoopState, RunOutcome};
pub use overlay::{OverlayScope, TargetOverlay};
pub use resource_lock::{CompositeGuard, ResourceLocks};
pub use settings::SettingsStore;
