//! REPL – Read-Eval-Print Loop for the Peon console.
//!
//! Supported slash-commands:
//!   /help                     – show this list
//!   /status                   – robot summary and per-loop counters
//!   /enable <name>            – set a behavior's gate
//!   /disable <name>           – clear a behavior's gate
//!   /settings <name> [json]   – show or replace a behavior's settings
//!   /eat /hunt /gather /store – run one iteration with the stored settings
//!   /armor                    – equip the best armor carried
//!   /save                     – write gates, settings and tuning to the config file
//!   /quit | /exit             – gracefully exit the console

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use peon_runtime::Robot;
use peon_types::{BehaviorKind, PeonError, Settings};

use crate::config::{self, Config};

/// A loop busy for longer than this is reported by `/status`.
const STALL_DEADLINE: Duration = Duration::from_secs(30);

/// What the REPL does after a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration; when set the REPL exits cleanly.
pub fn run(robot: &Robot, shutdown: Arc<AtomicBool>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "peon>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        if dispatch(robot, &line) == Flow::Quit {
            shutdown.store(true, Ordering::SeqCst);
            break;
        }
    }
}

/// Execute one command line against `robot`.
pub fn dispatch(robot: &Robot, line: &str) -> Flow {
    let line = line.trim();
    if line.is_empty() {
        return Flow::Continue;
    }
    let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match cmd {
        "/help" => cmd_help(),
        "/status" => cmd_status(robot),
        "/enable" => cmd_gate(robot, rest, true),
        "/disable" => cmd_gate(robot, rest, false),
        "/settings" => cmd_settings(robot, rest),
        "/eat" | "/hunt" | "/gather" | "/store" => {
            let name = &cmd[1..];
            report(name, robot.run_once(name, &robot.get_settings(name)));
        }
        "/armor" => report("armor", robot.don_armor()),
        "/save" => cmd_save(robot, &config::config_path()),
        "/quit" | "/exit" => {
            println!("{}", "Goodbye.".green());
            return Flow::Quit;
        }
        other => {
            println!(
                "{} '{}'. Type {} for available commands.",
                "Unknown command:".red(),
                other.yellow(),
                "/help".bold()
            );
        }
    }
    Flow::Continue
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "Peon Commands".bold().underline());
    println!("  {}                   – robot summary and loop counters", "/status".bold().cyan());
    println!("  {}  – toggle a behavior loop", "/enable <name>  /disable <name>".bold().cyan());
    println!("  {}   – show or replace settings", "/settings <name> [json]".bold().cyan());
    println!("  {} – run one iteration now", "/eat  /hunt  /gather  /store".bold().cyan());
    println!("  {}                    – equip the best armor carried", "/armor".bold().cyan());
    println!("  {}                     – write the running setup to the config file", "/save".bold().cyan());
    println!("  {}             – exit the console", "/quit  /exit".bold().cyan());
    println!();
    println!(
        "  Behaviors: {}",
        "fall, defend, eat, hunt, gather, store".dimmed()
    );
    println!(
        "  Settings JSON: {}",
        r#"{"args": [...], "kwargs": {...}}"#.dimmed()
    );
    println!();
}

fn cmd_status(robot: &Robot) {
    println!("{}", robot.to_string().bold());
    println!("{}", "Behavior loops".bold().underline());
    for (kind, record) in robot.loop_report() {
        let gate = if robot.is_enabled(kind.as_str()) {
            "on ".green()
        } else {
            "off".dimmed()
        };
        let last = record
            .last_finished_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<7} {} {:<18} runs={} ok={} missed={} failed={} faulted={} last={}",
            kind.as_str().bold(),
            gate,
            record.state.to_string(),
            record.runs,
            record.successes,
            record.misses,
            record.failures,
            record.faults,
            last
        );
    }
    let stalled = robot.stalled(STALL_DEADLINE);
    if !stalled.is_empty() {
        println!("  {} {:?}", "Stalled:".yellow().bold(), stalled);
    }
}

fn cmd_gate(robot: &Robot, name: &str, enable: bool) {
    let known = if enable {
        robot.enable(name)
    } else {
        robot.disable(name)
    };
    if !known {
        println!("{} '{}'", "Unknown behavior:".red(), name.yellow());
        return;
    }
    let verb = if enable { "enabled" } else { "disabled" };
    println!("{} {}", format!("✓ {name}").green(), verb);
}

fn cmd_settings(robot: &Robot, rest: &str) {
    let (name, json) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    if name.is_empty() {
        println!("Usage: {}", "/settings <name> [json]".bold());
        return;
    }
    let json = json.trim();
    if json.is_empty() {
        if name.parse::<BehaviorKind>().is_err() {
            println!("{} '{}'", "Unknown behavior:".red(), name.yellow());
            return;
        }
        let current = robot.get_settings(name);
        match serde_json::to_string(&current) {
            Ok(text) => println!("  {} {}", name.bold(), text),
            Err(e) => println!("{}: {}", "Error".red(), e),
        }
        return;
    }

    let settings: Settings = match serde_json::from_str(json) {
        Ok(s) => s,
        Err(e) => {
            println!("{}: {}", "Invalid settings JSON".red(), e);
            return;
        }
    };
    if robot.set_settings(name, settings) {
        println!("{} {}", "✓ Settings updated for".green(), name.bold());
    } else {
        println!("{} '{}'", "Unknown behavior:".red(), name.yellow());
    }
}

fn cmd_save(robot: &Robot, path: &PathBuf) {
    let base = match config::load_from(path) {
        Ok(Some(cfg)) => cfg,
        Ok(None) => Config::default(),
        Err(e) => {
            println!("{}: {} – not overwriting it", "Config error".red(), e);
            return;
        }
    };
    match config::save_to(&base.with_robot_state(robot), path) {
        Ok(()) => println!(
            "{} {}",
            "✓ Settings saved to".green(),
            path.display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn report(name: &str, result: Result<bool, PeonError>) {
    match result {
        Ok(true) => println!("{} {}", "✓".green().bold(), format!("{name} succeeded").green()),
        Ok(false) => println!("{} {}", "•".yellow(), format!("{name} made no progress").yellow()),
        Err(e) => println!("{} {}: {}", "✗".red().bold(), name.bold(), e.to_string().red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use peon_runtime::RobotConfig;
    use serde_json::json;

    fn robot() -> Robot {
        let sim = demo::scene();
        let mut config = RobotConfig::idle();
        for (kind, settings) in demo::settings() {
            config = config.with_settings(kind, settings);
        }
        Robot::new(Arc::new(sim.clone()), Arc::new(sim), config)
    }

    #[test]
    fn quit_and_exit_stop_the_loop() {
        let robot = robot();
        assert_eq!(dispatch(&robot, "/quit\n"), Flow::Quit);
        assert_eq!(dispatch(&robot, "  /exit "), Flow::Quit);
        assert_eq!(dispatch(&robot, ""), Flow::Continue);
        assert_eq!(dispatch(&robot, "/dance"), Flow::Continue);
    }

    #[test]
    fn enable_and_disable_toggle_gates() {
        let robot = robot();
        dispatch(&robot, "/enable hunt");
        assert!(robot.is_enabled("hunt"));
        dispatch(&robot, "/disable Hunt");
        assert!(!robot.is_enabled("hunt"));
        dispatch(&robot, "/enable dance");
        assert!(robot.active_behaviors().is_empty());
    }

    #[test]
    fn settings_command_replaces_settings() {
        let robot = robot();
        dispatch(&robot, r#"/settings eat {"kwargs": {"target": 18}}"#);
        let settings = robot.get_settings("eat");
        assert!(settings.args.is_empty());
        assert_eq!(settings.kwargs["target"], json!(18));

        // Malformed JSON leaves the settings alone.
        dispatch(&robot, "/settings eat {target: 3}");
        assert_eq!(robot.get_settings("eat").kwargs["target"], json!(18));
    }

    #[test]
    fn eat_command_feeds_the_robot() {
        let robot = robot();
        dispatch(&robot, "/eat");
        let food = robot.context().agent.status().food;
        assert_eq!(food, Some(20));
    }

    #[test]
    fn gather_command_collects_the_apple() {
        let robot = robot();
        dispatch(&robot, "/gather");
        let inventory = robot.context().agent.status().inventory.expect("inventory");
        assert!(inventory.contains("Apple"));
        assert_eq!(robot.context().agent.status().position.floor(), Some(demo::HOME));
    }

    #[test]
    fn store_command_fills_the_chest() {
        let robot = robot();
        dispatch(&robot, "/store");
        let inventory = robot.context().agent.status().inventory.expect("inventory");
        assert!(!inventory.contains("Cobblestone"));
    }

    #[test]
    fn save_writes_running_state_and_keeps_intervals() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[behaviors.hunt]\ninterval_ms = 2500\n").expect("write");

        let robot = robot();
        dispatch(&robot, "/enable hunt");
        dispatch(&robot, r#"/settings eat {"kwargs": {"target": 17}}"#);
        cmd_save(&robot, &path);

        let saved = config::load_from(&path).expect("load ok").expect("some");
        assert_eq!(saved.behaviors["hunt"].interval_ms, Some(2500));
        assert_eq!(saved.behaviors["eat"].kwargs["target"], json!(17));

        let restored = saved.to_robot_config().expect("valid config");
        assert_eq!(restored.enabled.into_iter().collect::<Vec<_>>(), vec![BehaviorKind::Hunt]);
        assert_eq!(restored.settings[&BehaviorKind::Gather].kwargs["items"], json!(["Apple"]));
    }

    #[test]
    fn save_refuses_to_overwrite_an_unreadable_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "behaviors = 3").expect("write");

        cmd_save(&robot(), &path);
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "behaviors = 3");
    }

    #[test]
    fn status_and_help_do_not_touch_state() {
        let robot = robot();
        dispatch(&robot, "/status");
        dispatch(&robot, "/help");
        assert!(robot.active_behaviors().is_empty());
        assert_eq!(
            robot.context().monitor.record(BehaviorKind::Eat).map(|r| r.runs),
            Some(0)
        );
    }
}
