//! Configuration Vault – reads/writes `~/.peon/config.toml`.
//!
//! ```toml
//! [behaviors.hunt]
//! enabled = true
//! interval_ms = 1000
//! args = [[10, 61, -4], ["Cow", "Pig"]]
//!
//! [behaviors.defend]
//! kwargs = { mob_types = ["Zombie", "Skeleton"] }
//!
//! [tuning]
//! min_health = 12.0
//! attack_timeout_ms = 8000
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use peon_runtime::{Robot, RobotConfig, Tuning};
use peon_types::{BehaviorKind, Settings};

/// One `[behaviors.<name>]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Start with the gate set; unset keeps the built-in choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub kwargs: Map<String, Value>,
}

impl BehaviorConfig {
    /// Stored settings, or `None` when neither args nor kwargs are given.
    fn settings(&self) -> Option<Settings> {
        let settings = Settings::new(self.args.clone(), self.kwargs.clone());
        (!settings.is_empty()).then_some(settings)
    }
}

/// The `[tuning]` table.  Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub min_health: f32,
    pub strike_range: f64,
    pub fall_speed: f64,
    pub home_timeout_ms: u64,
    pub hunt_path_timeout_ms: u64,
    pub gather_space: u32,
    pub gather_path_timeout_ms: u64,
    pub chest_space: u32,
    pub navigate_timeout_ms: u64,
    pub attack_space: u32,
    pub attack_step_timeout_ms: u64,
    pub attack_timeout_ms: u64,
    pub attack_pace_ms: u64,
    pub eat_wait_timeout_ms: u64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self::from(&Tuning::default())
    }
}

impl From<&Tuning> for TuningConfig {
    fn from(t: &Tuning) -> Self {
        let ms = |d: Duration| d.as_millis() as u64;
        Self {
            min_health: t.min_health,
            strike_range: t.strike_range,
            fall_speed: t.fall_speed,
            home_timeout_ms: ms(t.home_timeout),
            hunt_path_timeout_ms: ms(t.hunt_path_timeout),
            gather_space: t.gather_space,
            gather_path_timeout_ms: ms(t.gather_path_timeout),
            chest_space: t.chest_space,
            navigate_timeout_ms: ms(t.navigate_timeout),
            attack_space: t.attack_space,
            attack_step_timeout_ms: ms(t.attack_step_timeout),
            attack_timeout_ms: ms(t.attack_timeout),
            attack_pace_ms: ms(t.attack_pace),
            eat_wait_timeout_ms: ms(t.eat_wait_timeout),
        }
    }
}

impl From<&TuningConfig> for Tuning {
    fn from(c: &TuningConfig) -> Self {
        Tuning {
            min_health: c.min_health,
            strike_range: c.strike_range,
            fall_speed: c.fall_speed,
            home_timeout: Duration::from_millis(c.home_timeout_ms),
            hunt_path_timeout: Duration::from_millis(c.hunt_path_timeout_ms),
            gather_space: c.gather_space,
            gather_path_timeout: Duration::from_millis(c.gather_path_timeout_ms),
            chest_space: c.chest_space,
            navigate_timeout: Duration::from_millis(c.navigate_timeout_ms),
            attack_space: c.attack_space,
            attack_step_timeout: Duration::from_millis(c.attack_step_timeout_ms),
            attack_timeout: Duration::from_millis(c.attack_timeout_ms),
            attack_pace: Duration::from_millis(c.attack_pace_ms),
            eat_wait_timeout: Duration::from_millis(c.eat_wait_timeout_ms),
        }
    }
}

/// Persisted user configuration stored in `~/.peon/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Per-behavior overrides keyed by behavior name.
    #[serde(default)]
    pub behaviors: BTreeMap<String, BehaviorConfig>,

    #[serde(default)]
    pub tuning: TuningConfig,
}

impl Config {
    /// Build the runtime configuration.  Unknown behavior names are an
    /// error.
    pub fn to_robot_config(&self) -> Result<RobotConfig, String> {
        let mut robot = RobotConfig::default().with_tuning(Tuning::from(&self.tuning));
        for (name, behavior) in &self.behaviors {
            let kind: BehaviorKind = name
                .parse()
                .map_err(|e| format!("Invalid [behaviors.{name}] table: {e}"))?;
            match behavior.enabled {
                Some(true) => {
                    robot.enabled.insert(kind);
                }
                Some(false) => {
                    robot.enabled.remove(&kind);
                }
                None => {}
            }
            if let Some(ms) = behavior.interval_ms {
                robot = robot.with_interval(kind, Duration::from_millis(ms));
            }
            if let Some(settings) = behavior.settings() {
                robot = robot.with_settings(kind, settings);
            }
        }
        Ok(robot)
    }

    /// `self` with every behavior's gate and settings, and the tuning,
    /// replaced by what `robot` is running now.  Intervals are kept.
    pub fn with_robot_state(&self, robot: &Robot) -> Config {
        let mut cfg = self.clone();
        for kind in BehaviorKind::ALL {
            let settings = robot.get_settings(kind.as_str());
            let entry = cfg.behaviors.entry(kind.to_string()).or_default();
            entry.enabled = Some(robot.is_enabled(kind.as_str()));
            entry.args = settings.args;
            entry.kwargs = settings.kwargs;
        }
        cfg.tuning = TuningConfig::from(&robot.context().tuning);
        cfg
    }
}

/// Return the config path: `$PEON_CONFIG` when set, else
/// `~/.peon/config.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("PEON_CONFIG") {
        return PathBuf::from(path);
    }
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".peon").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `PEON_*` environment variable overrides to `cfg`.
///
/// | Variable | Effect |
/// |---|---|
/// | `PEON_ENABLED` | Comma-separated behavior names; exactly these start enabled. |
/// | `PEON_MIN_HEALTH` | `tuning.min_health` |
pub fn apply_env_overrides(cfg: &mut Config) {
    apply_overrides(
        cfg,
        std::env::var("PEON_ENABLED").ok().as_deref(),
        std::env::var("PEON_MIN_HEALTH").ok().as_deref(),
    );
}

pub(crate) fn apply_overrides(cfg: &mut Config, enabled: Option<&str>, min_health: Option<&str>) {
    if let Some(list) = enabled {
        let wanted: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        for kind in BehaviorKind::ALL {
            let on = wanted.iter().any(|w| w.eq_ignore_ascii_case(kind.as_str()));
            cfg.behaviors.entry(kind.to_string()).or_default().enabled = Some(on);
        }
    }
    if let Some(v) = min_health
        && let Ok(health) = v.trim().parse::<f32>()
    {
        cfg.tuning.min_health = health;
    }
}

/// Save the config to `path`, creating its directory if necessary.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Owner-only directory (rwx------) on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
