//! Structured Logging & Tracing
//!
//! Generator stages log under their own module targets, so each stage can be
//! turned up on its own when chasing a bad seed:
//! - `tree` and `embed` report room-by-room decisions at DEBUG/TRACE
//! - `finish` warns about floors it could not connect
//! - `survey` stays at WARN by default since it runs thousands of houses
//!
//! `RUST_LOG` always wins over the configured filter.

use std::collections::BTreeMap;
use std::sync::Once;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Generator stage, one per logging target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Tree,
    Embed,
    Finish,
    House,
    Survey,
}

impl Stage {
    pub fn target(&self) -> &'static str {
        match self {
            Stage::Tree => "house_core::tree",
            Stage::Embed => "house_core::embed",
            Stage::Finish => "house_core::finish",
            Stage::House => "house_core::house",
            Stage::Survey => "house_core::survey",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub stages: BTreeMap<Stage, LogLevel>,
    pub show_targets: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            stages: BTreeMap::from([(Stage::Survey, LogLevel::Warn)]),
            show_targets: true,
        }
    }
}

impl TracingConfig {
    /// Every placement decision, for replaying a single seed.
    pub fn verbose() -> Self {
        Self::default()
            .with_stage(Stage::Tree, LogLevel::Debug)
            .with_stage(Stage::Embed, LogLevel::Trace)
            .with_stage(Stage::Finish, LogLevel::Debug)
    }

    pub fn with_stage(mut self, stage: Stage, level: LogLevel) -> Self {
        self.stages.insert(stage, level);
        self
    }

    pub fn to_env_filter_string(&self) -> String {
        std::iter::once(self.default_level.as_str().to_string())
            .chain(
                self.stages
                    .iter()
                    .map(|(stage, level)| format!("{}={}", stage.target(), level.as_str())),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Install the global subscriber. Only the first call has any effect, and a
/// subscriber installed by the host is left alone.
pub fn init_tracing(config: &TracingConfig) {
    let filter = config.to_env_filter_string();
    let show_targets = config.show_targets;
    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(show_targets)
            .compact()
            .try_init();
    });
}

/// Entered span around one operation; logs its wall time at DEBUG on drop.
pub struct TimingSpan {
    name: &'static str,
    started: Instant,
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            started: Instant::now(),
            _span: tracing::info_span!("op", op = name).entered(),
        }
    }
}

impl Drop for TimingSpan {
    fn drop(&mut self) {
        let elapsed_us = self.started.elapsed().as_micros() as u64;
        tracing::debug!(op = self.name, elapsed_us, "done");
    }
}
