//! Terminal output for CLI handlers.
//!
//! Every line goes through [`emit`], which picks between a JSON event on
//! stdout (`{"type": .., "payload": ..}`), a styled human line, or nothing
//! in quiet mode. Warnings and errors ignore `--quiet`. Logs never land
//! here; they go to stderr through `tracing`.

use std::fmt::Display;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::{json, Value};

/// Output settings taken from the global flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static CONFIG: RwLock<OutputConfig> = RwLock::new(OutputConfig::new(false, false, 0));

fn current() -> OutputConfig {
    *CONFIG.read()
}

/// Whether a line survives `--quiet`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Level {
    Regular,
    Always,
}

/// Route one line to JSON or to the `human` printer.
fn emit(kind: &str, payload: Value, level: Level, human: impl FnOnce()) {
    let config = current();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
    } else if level == Level::Always || !config.quiet {
        human();
    }
}

pub fn configure(config: OutputConfig) {
    *CONFIG.write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn is_quiet() -> bool {
    current().quiet
}

#[must_use]
pub fn verbosity() -> u8 {
    current().verbose
}

/// Print the `deployctl <version>` banner.
pub fn header(version: &str) {
    emit(
        "header",
        json!({ "app": "deployctl", "version": version }),
        Level::Regular,
        || println!("{} {}\n", "deployctl".bold(), version.dimmed()),
    );
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        json!({ "label": label, "value": value }),
        Level::Regular,
        || println!("  {:<14} {}", label.dimmed(), value),
    );
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), Level::Regular, || {
        println!("  {} {}", "✓".green(), message);
    });
}

pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), Level::Always, || {
        println!("  {} {}", "⚠".yellow(), message);
    });
}

/// Print an error to stderr, as a JSON event in `--json` mode.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

/// Print the summary of a failed pipeline run to stderr.
///
/// In JSON mode this is one `stage_failed` event carrying the stage, the
/// failure class, and the message.
pub fn stage_failed(stage: impl Display, kind: &str, message: &str) {
    let stage = stage.to_string();
    if is_json() {
        eprintln!(
            "{}",
            json!({
                "type": "stage_failed",
                "payload": { "stage": stage, "kind": kind, "message": message },
            })
        );
    } else {
        eprintln!("  {} {} failed ({})", "×".red(), stage.bold(), kind.red());
        eprintln!("    {message}");
    }
}

pub fn section(title: &str) {
    emit("section", json!({ "title": title }), Level::Regular, || {
        println!("\n{}", title.bold());
    });
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a spinner. Hidden in JSON and quiet mode.
pub fn spinner(message: &str) -> ProgressBar {
    let config = current();
    let pb = if config.json || config.quiet {
        ProgressBar::hidden()
    } else {
        let style = ProgressStyle::default_spinner().tick_strings(SPINNER_FRAMES);
        let style = style
            .clone()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or(style);
        let pb = ProgressBar::new_spinner().with_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };
    pb.set_message(message.to_string());
    pb
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    let styled = format!("{} {}", "✓".green(), message);
    finish_spinner(pb, "spinner_success", styled, message, Level::Regular);
}

pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    let styled = format!("{} {}", "×".red(), message);
    finish_spinner(pb, "spinner_fail", styled, message, Level::Always);
}

fn finish_spinner(pb: &ProgressBar, kind: &str, styled: String, message: &str, level: Level) {
    let mut shown = false;
    emit(kind, json!({ "message": message }), level, || shown = true);
    if shown {
        pb.finish_with_message(styled);
    } else {
        pb.finish_and_clear();
    }
}

/// Cyan in human mode, plain in JSON.
pub fn highlight(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.cyan().to_string()
    }
}

/// Dimmed in human mode, plain in JSON.
pub fn muted(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.dimmed().to_string()
    }
}

pub fn hint(message: &str) {
    emit("hint", json!({ "message": message }), Level::Regular, || {
        println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
    });
}

/// Announce a pipeline step ("Deploying counter...").
pub fn action(verb: &str, target: &str) {
    emit(
        "action",
        json!({ "verb": verb, "target": target, "status": "in_progress" }),
        Level::Regular,
        || println!("  {} {}...", verb.bold().cyan(), target),
    );
}

/// Mark a pipeline step finished ("✓ Deployed 0200ab...").
pub fn action_done(verb: &str, target: &str) {
    emit(
        "action",
        json!({ "verb": verb, "target": target, "status": "done" }),
        Level::Regular,
        || println!("  {} {} {}", "✓".green(), verb.bold().green(), target),
    );
}

/// Print a command's own JSON document as one line.
pub fn json_output(value: Value) {
    println!("{value}");
}
