//! The per-behavior loop driver.
//!
//! Every registered behavior runs this loop on its own OS thread:
//!
//! 1. **Ready** – block on the agent's state condition until the fields the
//!    behavior reads have been reported.
//! 2. **Gate** – park while the behavior is disabled.
//! 3. **Run** – take the behavior's resource locks, read its settings
//!    fresh, and execute one iteration.  Errors and panics are logged and
//!    recorded; they never end the loop.
//! 4. **Sleep** – release the locks and sleep the behavior's interval.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread;

use peon_hal::AgentStatus;
use peon_kernel::{LoopState, RunOutcome};
use peon_types::BehaviorKind;
use tracing::{debug, error, info};

use crate::context::BehaviorContext;
use crate::registry::{BehaviorDescriptor, execute};

/// `true` once `status` carries everything `kind` reads.
pub fn is_ready(kind: BehaviorKind, status: &AgentStatus) -> bool {
    let position = status.position.is_known();
    let inventory = status.inventory.is_some();
    match kind {
        BehaviorKind::Fall => position,
        BehaviorKind::Defend | BehaviorKind::Gather | BehaviorKind::Store => {
            position && inventory
        }
        BehaviorKind::Eat => inventory && status.food.is_some(),
        BehaviorKind::Hunt => {
            position && inventory && status.food.is_some() && status.health.is_some()
        }
    }
}

/// Run one iteration of `descriptor` under its locks and record the outcome.
///
/// Never panics: a panic inside the behavior is caught here, after the
/// locks have been released by unwinding.
pub fn run_once(ctx: &BehaviorContext, descriptor: &BehaviorDescriptor) -> RunOutcome {
    let kind = descriptor.kind;
    let result = catch_unwind(AssertUnwindSafe(|| {
        let _guard = ctx.locks.acquire(&descriptor.locks);
        ctx.monitor.begin(kind);
        let settings = ctx.settings.get(kind);
        execute(kind, ctx, &settings)
    }));
    let outcome = match result {
        Ok(Ok(true)) => RunOutcome::Succeeded,
        Ok(Ok(false)) => {
            debug!(behavior = %kind, "behavior made no progress");
            RunOutcome::Missed
        }
        Ok(Err(e)) => {
            error!(behavior = %kind, error = %e, "behavior failed");
            RunOutcome::Failed
        }
        Err(panic) => {
            error!(behavior = %kind, panic = panic_message(panic.as_ref()), "behavior panicked");
            RunOutcome::Faulted
        }
    };
    ctx.monitor.finish(kind, outcome);
    outcome
}

/// Drive `descriptor` forever.  Intended as the body of the behavior's
/// thread.
pub fn run(ctx: Arc<BehaviorContext>, descriptor: BehaviorDescriptor) {
    let kind = descriptor.kind;
    let Some(gate) = ctx.gates.get(kind) else {
        error!(behavior = %kind, "behavior has no gate; loop not started");
        return;
    };

    ctx.monitor.transition(kind, LoopState::AwaitingReadiness);
    ctx.agent.wait_for(&|status| is_ready(kind, status), None);
    info!(behavior = %kind, interval = ?descriptor.interval, "behavior loop ready");

    loop {
        if !gate.is_set() {
            ctx.monitor.transition(kind, LoopState::Idle);
        }
        gate.wait();
        run_once(&ctx, &descriptor);
        thread::sleep(descriptor.interval);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::test_support::{context, scene};
    use peon_hal::SimWorld;
    use peon_types::{Resource, Settings};

    #[test]
    fn readiness_per_behavior() {
        let mut status = AgentStatus::default();
        assert!(BehaviorKind::ALL.iter().all(|k| !is_ready(*k, &status)));

        status.position = peon_types::Position::known(0.0, 64.0, 0.0);
        assert!(is_ready(BehaviorKind::Fall, &status));
        assert!(!is_ready(BehaviorKind::Defend, &status));

        status.inventory = Some(Default::default());
        assert!(is_ready(BehaviorKind::Gather, &status));
        assert!(!is_ready(BehaviorKind::Eat, &status));

        status.food = Some(20);
        assert!(is_ready(BehaviorKind::Eat, &status));
        assert!(!is_ready(BehaviorKind::Hunt, &status));

        status.health = Some(20.0);
        assert!(is_ready(BehaviorKind::Hunt, &status));
    }

    #[test]
    fn malformed_settings_fail_and_release_locks() {
        let sim = scene().build();
        let ctx = context(&sim);
        let registry = Registry::default();
        ctx.settings.set(BehaviorKind::Eat, Settings::default().with_kwarg("target", "full"));

        let eat = registry.get(BehaviorKind::Eat).unwrap();
        assert_eq!(run_once(&ctx, eat), RunOutcome::Failed);
        assert!(!ctx.locks.is_locked(Resource::Inventory));
        assert_eq!(ctx.monitor.record(BehaviorKind::Eat).unwrap().failures, 1);
    }

    #[test]
    fn panic_is_contained_and_releases_locks() {
        let sim: SimWorld = scene()
            .with_entity("Zombie", peon_types::BlockPos::new(1, 61, 0), 20.0)
            .panic_on_equip()
            .build();
        let ctx = context(&sim);
        let registry = Registry::default();
        let defend = registry.get(BehaviorKind::Defend).unwrap();
        ctx.settings.set(BehaviorKind::Defend, defend.defaults.clone());

        assert_eq!(run_once(&ctx, defend), RunOutcome::Faulted);
        assert!(!ctx.locks.is_locked(Resource::Inventory));
        assert_eq!(ctx.monitor.record(BehaviorKind::Defend).unwrap().faults, 1);

        // Next iteration runs normally once the fault is gone.
        ctx.settings.set(BehaviorKind::Defend, Settings::default());
        assert_eq!(run_once(&ctx, defend), RunOutcome::Succeeded);
    }

    #[test]
    fn panic_message_extracts_strings() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }
}
