//! Fan-out task

use crate::core::{ActivityFlag, EndTrigger, StartTrigger, StoryTask, TaskContext};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Fires every output on each activation of its input. Reusable: the task
/// returns to `Inactive` after each full firing. A fault in one output's
/// downstream is isolated at the dispatch boundary, so the remaining
/// outputs still fire.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BranchTask {
    #[serde(default)]
    pub input: StartTrigger,
    #[serde(default)]
    pub outputs: Vec<EndTrigger>,
}

impl StoryTask for BranchTask {
    fn on_triggered(&mut self, _port: usize, ctx: &mut TaskContext<'_>) -> Result<()> {
        ctx.set_activity(ActivityFlag::Active);
        for output in &self.outputs {
            ctx.fire(output);
        }
        ctx.set_activity(ActivityFlag::Inactive);
        Ok(())
    }

    fn start_triggers(&mut self) -> Vec<&mut StartTrigger> {
        vec![&mut self.input]
    }

    fn end_triggers(&mut self) -> Vec<&mut EndTrigger> {
        self.outputs.iter_mut().collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
