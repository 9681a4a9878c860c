//! `peon-cli` – Peon console
//!
//! This binary starts a robot and hands the terminal to an operator.  It:
//!
//! 1. Installs structured logging via `peon_runtime::init_tracing`.
//! 2. Loads `~/.peon/config.toml` (or `$PEON_CONFIG`), falling back to the
//!    built-in defaults when the file is absent or invalid.
//! 3. Builds the demo scene and starts one thread per behavior.
//! 4. Drops the user into an **interactive REPL** with slash-commands
//!    (`/status`, `/enable`, `/settings`, `/hunt`, `/help`, …).
//! 5. Intercepts **Ctrl-C** to park every behavior loop and exit safely.

mod config;
mod demo;
mod repl;

use colored::Colorize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, warn};

use peon_runtime::{Robot, RobotConfig};
use peon_types::BehaviorKind;

fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG selects the filter (default "info"); PEON_LOG_FORMAT=json
    // switches to newline-delimited JSON.  User-facing output stays on
    // println!.
    let _tracing = peon_runtime::init_tracing("peon");

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let robot_config = match config::load() {
        Ok(None) => {
            println!(
                "  No config at {}; using defaults.",
                config::config_path().display().to_string().bold()
            );
            RobotConfig::default()
        }
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg.to_robot_config().unwrap_or_else(|e| {
                println!("{}: {}", "Config error".red(), e);
                println!("  Using default configuration.");
                RobotConfig::default()
            })
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            RobotConfig::default()
        }
    };
    let robot_config = with_demo_settings(robot_config);

    // ── Robot ─────────────────────────────────────────────────────────────
    let sim = demo::scene();
    let robot = match Robot::spawn(Arc::new(sim.clone()), Arc::new(sim), robot_config) {
        Ok(robot) => Arc::new(robot),
        Err(e) => {
            error!(error = %e, "failed to start behavior threads");
            println!("{}: {}", "Startup failed".red().bold(), e);
            std::process::exit(1);
        }
    };
    println!("  {}", robot.to_string().dimmed());

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    let robot_ctrlc = robot.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – parking behavior loops …".yellow().bold());
        for kind in BehaviorKind::ALL {
            robot_ctrlc.disable(kind.as_str());
        }
        println!("{}", "  ✓ All behaviors disabled.".green());
        println!("{}", "  ✓ Exiting Peon.".green());

        shutdown_clone.store(true, Ordering::SeqCst);
        std::process::exit(130);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    println!();
    println!("  Type {} for a list of commands.\n", "/help".bold().cyan());

    // ── Interactive REPL ──────────────────────────────────────────────────
    repl::run(&robot, shutdown);
}

/// Fill in demo-scene settings for behaviors the config file left empty.
fn with_demo_settings(mut config: RobotConfig) -> RobotConfig {
    for (kind, settings) in demo::settings() {
        config.settings.entry(kind).or_insert(settings);
    }
    config
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"    ____                   "#.bold().cyan());
    println!("{}", r#"   / __ \___  ____  ____   "#.bold().cyan());
    println!("{}", r#"  / /_/ / _ \/ __ \/ __ \  "#.bold().cyan());
    println!("{}", r#" / ____/  __/ /_/ / / / /  "#.bold().cyan());
    println!("{}", r#"/_/    \___/\____/_/ /_/   "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "Peon".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Concurrent behavior kernel for game agents");
    println!();
}
