//! Subscriber setup for hosts that want contract events logged.
//!
//! The library only emits `tracing` events; it never installs a subscriber
//! on its own. Binaries and test harnesses can call [`init`], which is
//! controlled by `CONTRACT_LOG`:
//! - unset, empty or `off` → nothing installed (zero overhead)
//! - `stderr` → human-readable events on stderr
//! - `json` → JSON events on stderr
//!
//! Filtering follows `RUST_LOG`, defaulting to `info`.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the telemetry mode.
pub const LOG_ENV: &str = "CONTRACT_LOG";

/// What [`init`] installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// No subscriber.
    Off,
    /// Plain-text fmt layer on stderr.
    Stderr,
    /// JSON fmt layer on stderr.
    Json,
}

impl Mode {
    /// Parse a `CONTRACT_LOG` value. Unknown values map to `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "off" => Some(Self::Off),
            "stderr" => Some(Self::Stderr),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Stderr => write!(f, "stderr"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Install a global subscriber according to `CONTRACT_LOG`.
///
/// Returns the mode actually in effect. If another subscriber is already
/// installed, it is left alone and [`Mode::Off`] is returned.
#[must_use]
pub fn init() -> Mode {
    let requested = std::env::var(LOG_ENV).ok();
    let mode = match requested.as_deref() {
        None => Mode::Off,
        Some(value) => Mode::parse(value).unwrap_or_else(|| {
            eprintln!("warning: {LOG_ENV}={value} not recognised, telemetry disabled");
            Mode::Off
        }),
    };
    init_with(mode)
}

/// Install a global subscriber in the given mode.
#[must_use]
pub fn init_with(mode: Mode) -> Mode {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match mode {
        Mode::Off => return Mode::Off,
        Mode::Stderr => tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        Mode::Json => tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if installed.is_ok() { mode } else { Mode::Off }
}
