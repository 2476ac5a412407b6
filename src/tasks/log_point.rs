//! Log-emitting story point

use super::point::{PointBehavior, StoryPoint};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Severity for a [`LogMessage`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

/// Emits a message through the log facade when the step runs. Handy as a
/// breadcrumb while authoring a graph.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LogMessage {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub message: String,
}

impl PointBehavior for LogMessage {
    fn execute(&mut self) -> Result<()> {
        match self.level {
            LogLevel::Error => log::error!("{}", self.message),
            LogLevel::Warn => log::warn!("{}", self.message),
            LogLevel::Info => log::info!("{}", self.message),
            LogLevel::Debug => log::debug!("{}", self.message),
            LogLevel::Trace => log::trace!("{}", self.message),
        }
        Ok(())
    }
}

/// The `builtin/log` task kind.
pub type LogPoint = StoryPoint<LogMessage>;
