//! Story line - base wrapper for deferred-effect behaviors
//!
//! A line is the one-input/one-output shape most custom story steps take:
//! show a dialogue, play a transition, wait for the player. The wrapped
//! behavior starts its effect when the line activates and may finish
//! immediately or stay pending until the host resumes the task.

use crate::core::{ActivityFlag, EndTrigger, StartTrigger, StoryTask, TaskContext};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// What a line behavior did with its activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// The effect completed; the line fires its end trigger.
    Finished,
    /// The effect is waiting on the host; the line stays `Active` until
    /// `StoryRunner::resume` delivers a payload to it.
    Pending,
}

/// Effect carried by a [`StoryLine`].
pub trait LineBehavior: fmt::Debug {
    /// Start the effect. Runs on activation, with the line already
    /// `Active`.
    fn execute(&mut self, ctx: &mut TaskContext<'_>) -> Result<LineOutcome>;

    /// Continue a pending effect with a host payload. Behaviors that never
    /// return [`LineOutcome::Pending`] keep the default.
    fn resume(&mut self, payload: serde_json::Value, ctx: &mut TaskContext<'_>) -> Result<LineOutcome> {
        let _ = (payload, ctx);
        anyhow::bail!("line behavior does not accept a host resume")
    }
}

/// One-input/one-output task wrapping a [`LineBehavior`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoryLine<B> {
    #[serde(default)]
    pub start: StartTrigger,
    #[serde(default)]
    pub end: EndTrigger,
    #[serde(flatten)]
    pub behavior: B,
}

impl<B> StoryLine<B> {
    fn finish(&self, ctx: &mut TaskContext<'_>) {
        if ctx.activity() == ActivityFlag::Inactive {
            log::warn!(
                "Story line '{}' finished while it is already inactive",
                ctx.kind()
            );
        }
        ctx.set_activity(ActivityFlag::Inactive);
        ctx.fire(&self.end);
    }
}

impl<B> StoryTask for StoryLine<B>
where
    B: LineBehavior + 'static,
{
    fn on_triggered(&mut self, _port: usize, ctx: &mut TaskContext<'_>) -> Result<()> {
        if ctx.activity() == ActivityFlag::Active {
            log::warn!(
                "Story line '{}' started while it is already active",
                ctx.kind()
            );
        }

        ctx.set_activity(ActivityFlag::Active);
        match self.behavior.execute(ctx)? {
            LineOutcome::Finished => self.finish(ctx),
            LineOutcome::Pending => {}
        }
        Ok(())
    }

    fn on_resume(&mut self, payload: serde_json::Value, ctx: &mut TaskContext<'_>) -> Result<()> {
        match self.behavior.resume(payload, ctx)? {
            LineOutcome::Finished => self.finish(ctx),
            LineOutcome::Pending => {}
        }
        Ok(())
    }

    fn start_triggers(&mut self) -> Vec<&mut StartTrigger> {
        vec![&mut self.start]
    }

    fn end_triggers(&mut self) -> Vec<&mut EndTrigger> {
        vec![&mut self.end]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
