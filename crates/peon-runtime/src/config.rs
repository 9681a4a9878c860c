//! Robot construction options and behavior pacing.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use peon_types::{BehaviorKind, Settings};

/// Pacing constants and thresholds used by the behaviors.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    /// Hunting and attacking stop at or below this health.
    pub min_health: f32,
    /// Reach of the defend behavior, in blocks.
    pub strike_range: f64,
    /// Speed used by fall recovery, in blocks per second.
    pub fall_speed: f64,
    pub home_timeout: Duration,
    pub hunt_path_timeout: Duration,
    pub gather_space: u32,
    pub gather_path_timeout: Duration,
    pub chest_space: u32,
    /// Timeout for navigations with no more specific limit.
    pub navigate_timeout: Duration,
    pub attack_space: u32,
    /// Per-attempt navigation timeout while chasing an entity.
    pub attack_step_timeout: Duration,
    /// Total time spent chasing one entity.
    pub attack_timeout: Duration,
    pub attack_pace: Duration,
    /// How long feeding waits for one item to be consumed.
    pub eat_wait_timeout: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_health: 10.0,
            strike_range: 4.0,
            fall_speed: 13.0,
            home_timeout: Duration::from_secs(30),
            hunt_path_timeout: Duration::from_secs(10),
            gather_space: 1,
            gather_path_timeout: Duration::from_secs(30),
            chest_space: 3,
            navigate_timeout: Duration::from_secs(30),
            attack_space: 3,
            attack_step_timeout: Duration::from_secs(2),
            attack_timeout: Duration::from_secs(6),
            attack_pace: Duration::from_millis(100),
            eat_wait_timeout: Duration::from_secs(5),
        }
    }
}

/// Options for building a [`Robot`][crate::robot::Robot].
///
/// Anything left unset falls back to the registry defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotConfig {
    /// Behaviors whose gate is set at construction.
    pub enabled: BTreeSet<BehaviorKind>,
    pub intervals: BTreeMap<BehaviorKind, Duration>,
    /// Initial settings, replacing the registry defaults per behavior.
    pub settings: BTreeMap<BehaviorKind, Settings>,
    pub tuning: Tuning,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            enabled: [BehaviorKind::Fall, BehaviorKind::Eat, BehaviorKind::Defend].into(),
            intervals: BTreeMap::new(),
            settings: BTreeMap::new(),
            tuning: Tuning::default(),
        }
    }
}

impl RobotConfig {
    /// A configuration with every behavior disabled.
    pub fn idle() -> Self {
        Self {
            enabled: BTreeSet::new(),
            ..Self::default()
        }
    }

    pub fn with_enabled(mut self, kind: BehaviorKind) -> Self {
        self.enabled.insert(kind);
        self
    }

    pub fn with_interval(mut self, kind: BehaviorKind, interval: Duration) -> Self {
        self.intervals.insert(kind, interval);
        self
    }

    pub fn with_settings(mut self, kind: BehaviorKind, settings: Settings) -> Self {
        self.settings.insert(kind, settings);
        self
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_survival_behaviors() {
        let config = RobotConfig::default();
        assert!(config.enabled.contains(&BehaviorKind::Fall));
        assert!(config.enabled.contains(&BehaviorKind::Eat));
        assert!(config.enabled.contains(&BehaviorKind::Defend));
        assert!(!config.enabled.contains(&BehaviorKind::Hunt));
    }

    #[test]
    fn idle_builder_adds_behaviors() {
        let config = RobotConfig::idle()
            .with_enabled(BehaviorKind::Gather)
            .with_interval(BehaviorKind::Gather, Duration::from_millis(5));
        assert_eq!(config.enabled, [BehaviorKind::Gather].into());
        assert_eq!(config.intervals[&BehaviorKind::Gather], Duration::from_millis(5));
    }
}
