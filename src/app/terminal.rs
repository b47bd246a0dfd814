//! Terminal capability detection and tracing setup.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// What the attached terminal supports, sampled once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TerminalProfile {
    pub(crate) stderr_is_terminal: bool,
    pub(crate) dumb: bool,
    pub(crate) no_color_env: bool,
}

impl TerminalProfile {
    pub(crate) fn detect() -> Self {
        Self {
            stderr_is_terminal: io::stderr().is_terminal(),
            dumb: std::env::var_os("TERM").is_some_and(|term| term.eq_ignore_ascii_case("dumb")),
            no_color_env: std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()),
        }
    }

    pub(crate) fn use_color(self, no_color_flag: bool) -> bool {
        !(no_color_flag || self.no_color_env || self.dumb)
    }

    /// Progress bars redraw in place; they need an interactive, capable stderr.
    pub(crate) fn show_progress(self, quiet: bool) -> bool {
        self.stderr_is_terminal && !self.dumb && !quiet
    }
}

/// Installs the stderr subscriber.
///
/// `RUST_LOG` wins over `default_level` unless `ignore_rust_log` is set, which
/// happens when `-v`/`-q` were given explicitly.
pub(crate) fn init_tracing(default_level: &str, ignore_rust_log: bool, ansi: bool) {
    let from_env = if ignore_rust_log {
        None
    } else {
        EnvFilter::try_from_default_env().ok()
    };
    let filter = from_env.unwrap_or_else(|| EnvFilter::new(default_level));
    // Already installed when called twice (tests).
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .with_env_filter(filter)
        .try_init();
}
