//! Entry-point task

use crate::core::{EndTrigger, StoryTask, TaskContext};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Graph entry point: fires its output once when the start phase reaches
/// it. Has no inputs, so nothing else can activate it.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StartTask {
    #[serde(default)]
    pub output: EndTrigger,
}

impl StoryTask for StartTask {
    fn on_start(&mut self, ctx: &mut TaskContext<'_>) -> Result<()> {
        ctx.fire(&self.output);
        Ok(())
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
