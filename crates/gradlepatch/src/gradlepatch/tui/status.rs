//! One-line, human-readable status messages.

use crate::gradlepatch::tui::progress::GLOBAL_MP;
use std::fmt::Display;
use tracing::debug;

pub const SEPARATOR: &str = "==================================================";

fn emit_line(line: String) {
    // `println` is a no-op while the draw target is hidden (e.g. stdout is not a tty)
    if GLOBAL_MP.is_hidden() {
        println!("{line}");
    } else if let Err(e) = GLOBAL_MP.println(&line) {
        debug!("progress output unavailable ({e}), printing to stderr");
        eprintln!("{line}");
    }
}

fn emit(prefix: &str, message: impl Display) {
    emit_line(format!("{prefix} {message}"));
}

pub fn success(message: impl Display) {
    emit("✅", message);
}

pub fn failure(message: impl Display) {
    emit("❌", message);
}

pub fn notice(message: impl Display) {
    emit("ℹ️ ", message);
}

pub fn warning(message: impl Display) {
    emit("⚠️ ", message);
}

pub fn banner(message: impl Display) {
    emit("🚀", message);
    separator();
}

pub fn separator() {
    emit_line(SEPARATOR.to_string());
}
