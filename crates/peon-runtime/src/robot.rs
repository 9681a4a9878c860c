//! [`Robot`] – the public facade over the behavior loops.
//!
//! A robot owns one [`BehaviorContext`] and one OS thread per registered
//! behavior.  Behaviors are addressed by name (`"eat"`, `"hunt"`, …);
//! unknown names are reported as `false` rather than failing.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use peon_hal::SimWorld;
//! use peon_runtime::{Robot, RobotConfig};
//!
//! let sim = SimWorld::builder().build();
//! let robot = Robot::spawn(Arc::new(sim.clone()), Arc::new(sim), RobotConfig::default())
//!     .expect("behavior threads");
//! robot.enable("hunt");
//! println!("{robot}");
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use peon_hal::{Agent, World};
use peon_kernel::LoopRecord;
use peon_types::{BehaviorKind, PeonError, Resource, Settings};
use serde_json::json;
use tracing::{info, warn};

use crate::armor;
use crate::behavior_loop;
use crate::config::RobotConfig;
use crate::context::BehaviorContext;
use crate::params::{DefendParams, EatParams, GatherParams, HuntParams, Params, StoreParams};
use crate::registry::{Registry, execute};

pub struct Robot {
    ctx: Arc<BehaviorContext>,
    registry: Registry,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Robot {
    /// Build a robot without starting its behavior threads.
    ///
    /// Settings start from the registry defaults, overridden per behavior
    /// by `config.settings`; the gates in `config.enabled` start set.
    pub fn new(agent: Arc<dyn Agent>, world: Arc<dyn World>, config: RobotConfig) -> Self {
        let mut registry = Registry::default();
        for (kind, interval) in &config.intervals {
            if let Some(descriptor) = registry.get_mut(*kind) {
                descriptor.interval = *interval;
            }
        }

        let ctx = BehaviorContext::new(agent, world, config.tuning);
        for descriptor in registry.iter() {
            let settings = config
                .settings
                .get(&descriptor.kind)
                .cloned()
                .unwrap_or_else(|| descriptor.defaults.clone());
            ctx.settings.set(descriptor.kind, settings);
        }
        for kind in &config.enabled {
            ctx.gates.enable(*kind);
        }

        Self {
            ctx: Arc::new(ctx),
            registry,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Build a robot and start its behavior threads.
    pub fn spawn(
        agent: Arc<dyn Agent>,
        world: Arc<dyn World>,
        config: RobotConfig,
    ) -> Result<Self, PeonError> {
        let robot = Self::new(agent, world, config);
        robot.start()?;
        Ok(robot)
    }

    /// Start one thread per registered behavior.  Calling it again is a
    /// no-op.
    pub fn start(&self) -> Result<(), PeonError> {
        let mut handles = self.handles.lock();
        if !handles.is_empty() {
            warn!("behavior threads already started");
            return Ok(());
        }
        for descriptor in self.registry.iter() {
            let ctx = Arc::clone(&self.ctx);
            let descriptor = descriptor.clone();
            let handle = thread::Builder::new()
                .name(format!("peon-{}", descriptor.kind))
                .spawn(move || behavior_loop::run(ctx, descriptor))
                .map_err(|e| PeonError::Spawn(e.to_string()))?;
            handles.push(handle);
        }
        info!(behaviors = handles.len(), active = ?self.active_behaviors(), "robot started");
        Ok(())
    }

    // ── gates ──────────────────────────────────────────────────────────────

    pub fn enable(&self, name: &str) -> bool {
        name.parse::<BehaviorKind>().is_ok_and(|kind| self.ctx.gates.enable(kind))
    }

    pub fn disable(&self, name: &str) -> bool {
        name.parse::<BehaviorKind>().is_ok_and(|kind| self.ctx.gates.disable(kind))
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        name.parse::<BehaviorKind>().is_ok_and(|kind| self.ctx.gates.is_enabled(kind))
    }

    pub fn active_behaviors(&self) -> Vec<BehaviorKind> {
        self.ctx.gates.active()
    }

    // ── settings ───────────────────────────────────────────────────────────

    /// Replace the settings `name` runs with from its next iteration on.
    pub fn set_settings(&self, name: &str, settings: Settings) -> bool {
        name.parse::<BehaviorKind>().is_ok_and(|kind| self.ctx.settings.set(kind, settings))
    }

    /// Current settings for `name`; empty for unknown names.
    pub fn get_settings(&self, name: &str) -> Settings {
        name.parse::<BehaviorKind>()
            .map(|kind| self.ctx.settings.get(kind))
            .unwrap_or_default()
    }

    /// Mob types the defend loop is configured to strike.
    ///
    /// Does not include types a running hunt has added temporarily.
    pub fn defend_targets(&self) -> BTreeSet<String> {
        DefendParams::bind(&self.ctx.settings.get(BehaviorKind::Defend))
            .map(|p| p.mob_types)
            .unwrap_or_default()
    }

    pub fn set_defend_targets(&self, mob_types: &BTreeSet<String>) {
        self.ctx.settings.update(BehaviorKind::Defend, |s| {
            s.args.clear();
            s.kwargs.insert("mob_types".to_string(), json!(mob_types));
        });
    }

    // ── one-shot behaviors ─────────────────────────────────────────────────

    /// Run one iteration of `name` with `settings`, under its locks.
    pub fn run_once(&self, name: &str, settings: &Settings) -> Result<bool, PeonError> {
        let kind: BehaviorKind = name.parse()?;
        let _guard = self.ctx.locks.acquire(&self.registry.locks(kind));
        execute(kind, &self.ctx, settings)
    }

    pub fn eat(&self, params: &EatParams) -> Result<bool, PeonError> {
        self.run_typed(params)
    }

    pub fn hunt(&self, params: &HuntParams) -> Result<bool, PeonError> {
        self.run_typed(params)
    }

    pub fn gather(&self, params: &GatherParams) -> Result<bool, PeonError> {
        self.run_typed(params)
    }

    pub fn store_items(&self, params: &StoreParams) -> Result<bool, PeonError> {
        self.run_typed(params)
    }

    /// Equip the best armor carried, under the inventory lock.
    pub fn don_armor(&self) -> Result<bool, PeonError> {
        let _guard = self.ctx.locks.acquire(&[Resource::Inventory].into());
        armor::don_armor(&self.ctx)
    }

    fn run_typed<P: Params + serde::Serialize>(&self, params: &P) -> Result<bool, PeonError> {
        let kwargs = match serde_json::to_value(params) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                return Err(PeonError::InvalidSettings {
                    behavior: P::KIND,
                    details: "parameters must serialize to a map".to_string(),
                });
            }
        };
        self.run_once(P::KIND.as_str(), &Settings::new(Vec::new(), kwargs))
    }

    // ── monitoring ─────────────────────────────────────────────────────────

    pub fn loop_report(&self) -> Vec<(BehaviorKind, LoopRecord)> {
        self.ctx.monitor.snapshot()
    }

    /// Behaviors stuck in a single run for longer than `deadline`.
    pub fn stalled(&self, deadline: Duration) -> Vec<BehaviorKind> {
        self.ctx.monitor.stalled(deadline)
    }

    pub fn context(&self) -> &BehaviorContext {
        &self.ctx
    }
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.ctx.agent.status();
        let xyz = status
            .position
            .floor()
            .map_or_else(|| "unknown".to_string(), |p| p.to_string());
        let health = status.health.map_or_else(|| "unknown".to_string(), |h| h.to_string());
        let food = status.food.map_or_else(|| "unknown".to_string(), |h| h.to_string());
        let active: Vec<_> = self.active_behaviors().iter().map(|k| k.as_str()).collect();
        write!(
            f,
            "Robot(xyz={xyz}, health={health}, food={food}, auto_actions=[{}])",
            active.join(", ")
        )
    }
}
