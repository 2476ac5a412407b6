//! Fan-in barrier task

use crate::core::{ActivityFlag, EndTrigger, StartTrigger, StoryTask, TaskContext};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Start trigger paired with an observed-at-least-once flag. The flag is
/// runtime bookkeeping and is not persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartTriggerWithFlag {
    #[serde(default)]
    pub trigger: StartTrigger,
    #[serde(skip)]
    pub is_triggered: bool,
}

impl StartTriggerWithFlag {
    pub fn linked(link: crate::core::LinkId) -> Self {
        Self {
            trigger: StartTrigger::linked(link),
            is_triggered: false,
        }
    }
}

/// Fires its output exactly once, the moment every input has been observed
/// at least once, in any order. Further input firings after completion are
/// ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WhenAllTask {
    #[serde(default)]
    pub inputs: Vec<StartTriggerWithFlag>,
    #[serde(default)]
    pub output: EndTrigger,
    #[serde(skip)]
    completed: bool,
}

impl StoryTask for WhenAllTask {
    fn on_awake(&mut self) {
        self.completed = false;
        for input in &mut self.inputs {
            input.is_triggered = false;
        }
    }

    fn on_triggered(&mut self, port: usize, ctx: &mut TaskContext<'_>) -> Result<()> {
        if self.completed {
            return Ok(());
        }

        let input = self
            .inputs
            .get_mut(port)
            .ok_or_else(|| anyhow::anyhow!("no input port {}", port))?;
        input.is_triggered = true;

        if self.inputs.iter().all(|input| input.is_triggered) {
            ctx.set_activity(ActivityFlag::Active);
            ctx.fire(&self.output);
            ctx.set_activity(ActivityFlag::Completed);
            self.completed = true;
        }
        Ok(())
    }

    fn start_triggers(&mut self) -> Vec<&mut StartTrigger> {
        self.inputs
            .iter_mut()
            .map(|input| &mut input.trigger)
            .collect()
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
