//! Fan-in relay task

use crate::core::{ActivityFlag, EndTrigger, StartTrigger, StoryTask, TaskContext};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Fires its output every time any input triggers. Unlike `WhenAnyTask`
/// it never completes; it is a reusable merge point.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnyTask {
    #[serde(default)]
    pub inputs: Vec<StartTrigger>,
    #[serde(default)]
    pub output: EndTrigger,
}

impl StoryTask for AnyTask {
    fn on_triggered(&mut self, _port: usize, ctx: &mut TaskContext<'_>) -> Result<()> {
        ctx.set_activity(ActivityFlag::Active);
        ctx.fire(&self.output);
        ctx.set_activity(ActivityFlag::Inactive);
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
