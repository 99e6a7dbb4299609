//! Logging utilities with colored output.
//!
//! Both tools report progress through the `log!` macro, which prints a
//! colored `[module]` prefix followed by the message. `debug!` lines only show
//! up when `--verbose` was passed.
//!
//! # Example
//!
//! ```ignore
//! log!("sprite"; "wrote {} symbols to {}", count, path.display());
//! debug!("sprite"; "normalized {}", id);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream::Stdout};
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Apply the `--color` choice to every colored write in the process.
pub fn apply_color_choice(choice: clap::ColorChoice) {
    match choice {
        clap::ColorChoice::Always => owo_colors::set_override(true),
        clap::ColorChoice::Never => owo_colors::set_override(false),
        clap::ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "sprite" => prefix
            .if_supports_color(Stdout, |p| p.bright_blue().bold().to_string())
            .to_string(),
        "export" => prefix
            .if_supports_color(Stdout, |p| p.bright_green().bold().to_string())
            .to_string(),
        "error" => prefix
            .if_supports_color(Stdout, |p| p.bright_red().bold().to_string())
            .to_string(),
        _ => prefix
            .if_supports_color(Stdout, |p| p.bright_yellow().bold().to_string())
            .to_string(),
    }
}
