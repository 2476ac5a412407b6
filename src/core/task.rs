//! Story task contract - activity state and lifecycle hooks
//!
//! A story task is a unit of narrative behavior. Concrete variants declare
//! their trigger ports through `start_triggers`/`end_triggers` so the graph
//! controller can repair link references without reflection, and react to
//! activation through the lifecycle hooks.

use crate::core::runner::TaskContext;
use crate::core::trigger::{EndTrigger, StartTrigger};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Activity state of a story task, used for execution bookkeeping and
/// live visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityFlag {
    /// The task is idle.
    Inactive,
    /// The task is currently running (or waiting on a deferred effect).
    Active,
    /// The task's effect raised an error. Terminal: the runner ignores
    /// further triggers for a failed task.
    Failed,
    /// The task finished and must not run again.
    Completed,
}

impl Default for ActivityFlag {
    fn default() -> Self {
        Self::Inactive
    }
}

impl ActivityFlag {
    /// True for the default (idle) state.
    pub fn is_inactive(&self) -> bool {
        *self == Self::Inactive
    }
}

impl fmt::Display for ActivityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Active => write!(f, "active"),
            Self::Failed => write!(f, "failed"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Behavior contract for story tasks.
///
/// Implementations keep their trigger ports as plain fields and return them
/// from `start_triggers`/`end_triggers` in declaration order - the port
/// index passed to `on_triggered` is the position in that list.
///
/// Errors returned from the hooks are caught at the dispatch boundary: the
/// runner logs them and marks the task `Failed` without aborting sibling
/// branches or the outer startup loops.
pub trait StoryTask: Any + fmt::Debug {
    /// One-time setup before the graph starts. Input subscriptions are
    /// wired by the runner before this hook runs; no triggers fire here.
    fn on_awake(&mut self) {}

    /// Called once when the graph begins execution, in collection order.
    /// Entry-point tasks fire their outputs here.
    fn on_start(&mut self, ctx: &mut TaskContext<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called when one of this task's start triggers fires. `port` is the
    /// index into `start_triggers`.
    fn on_triggered(&mut self, port: usize, ctx: &mut TaskContext<'_>) -> Result<()> {
        let _ = (port, ctx);
        Ok(())
    }

    /// Called when the host delivers a payload to a task waiting on a
    /// deferred effect. Tasks that never defer keep the default.
    fn on_resume(&mut self, payload: serde_json::Value, ctx: &mut TaskContext<'_>) -> Result<()> {
        let _ = (payload, ctx);
        anyhow::bail!("task does not accept a host resume")
    }

    /// This task's input ports, in declaration order.
    fn start_triggers(&mut self) -> Vec<&mut StartTrigger> {
        Vec::new()
    }

    /// This task's output ports, in declaration order.
    fn end_triggers(&mut self) -> Vec<&mut EndTrigger> {
        Vec::new()
    }

    /// Upcast for registry-driven serialization.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for editor-driven payload mutation.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
