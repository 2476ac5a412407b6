//! Fan-in race task

use crate::core::{ActivityFlag, EndTrigger, StartTrigger, StoryTask, TaskContext};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Fires its output on the first input that triggers, then completes and
/// ignores every later input.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WhenAnyTask {
    #[serde(default)]
    pub inputs: Vec<StartTrigger>,
    #[serde(default)]
    pub output: EndTrigger,
    #[serde(skip)]
    completed: bool,
}

impl StoryTask for WhenAnyTask {
    fn on_awake(&mut self) {
        self.completed = false;
    }

    fn on_triggered(&mut self, _port: usize, ctx: &mut TaskContext<'_>) -> Result<()> {
        if self.completed {
            return Ok(());
        }

        ctx.set_activity(ActivityFlag::Active);
        ctx.fire(&self.output);
        ctx.set_activity(ActivityFlag::Completed);
        self.completed = true;
        Ok(())
    }

    fn start_triggers(&mut self) -> Vec<&mut StartTrigger> {
        self.inputs.iter_mut().collect()
    }

    fn end_triggers(&mut self) -> Vec<&mut EndTrigger> {
        vec![&mut self.output]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
