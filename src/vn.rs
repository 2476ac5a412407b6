//! Visual-novel demo tasks for the CLI host
//!
//! A minimal dialogue vocabulary on top of the story graph engine. These
//! kinds print to stdout and wait on the interactive host loop in
//! `main.rs`, which feeds player input back through `StoryRunner::resume`.
//! They also show how a downstream binary registers its own task kinds
//! next to the built-ins.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;
use storytool::core::{ActivityFlag, EndTrigger, StartTrigger, StoryTask, TaskContext};
use storytool::tasks::{LineBehavior, LineOutcome, StoryLine};
use storytool::TaskRegistry;

/// Kinds the host loop must service with player input.
pub const WAITING_KINDS: &[&str] = &["vn/dialogue", "vn/choice"];

/// Prints one line of dialogue, then waits for the player to continue.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DialogueLine {
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub text: String,
}

impl LineBehavior for DialogueLine {
    fn execute(&mut self, _ctx: &mut TaskContext<'_>) -> Result<LineOutcome> {
        match &self.speaker {
            Some(speaker) => println!("{}: {}", speaker, self.text),
            None => println!("{}", self.text),
        }
        Ok(LineOutcome::Pending)
    }

    fn resume(
        &mut self,
        _payload: serde_json::Value,
        _ctx: &mut TaskContext<'_>,
    ) -> Result<LineOutcome> {
        // Any acknowledgment continues the story.
        Ok(LineOutcome::Finished)
    }
}

/// The `vn/dialogue` task kind.
pub type Dialogue = StoryLine<DialogueLine>;

/// One selectable answer of a [`ChoicePrompt`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub output: EndTrigger,
}

/// Prints a prompt with numbered choices and fires the output of the one
/// the player picks. Branches the story on player input.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChoicePrompt {
    #[serde(default)]
    pub input: StartTrigger,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl StoryTask for ChoicePrompt {
    fn on_triggered(&mut self, _port: usize, ctx: &mut TaskContext<'_>) -> Result<()> {
        ctx.set_activity(ActivityFlag::Active);
        match &self.speaker {
            Some(speaker) => println!("{}: {}", speaker, self.text),
            None => println!("{}", self.text),
        }
        for (number, choice) in self.choices.iter().enumerate() {
            println!("  [{}] {}", number + 1, choice.text);
        }
        Ok(())
    }

    fn on_resume(&mut self, payload: serde_json::Value, ctx: &mut TaskContext<'_>) -> Result<()> {
        let picked = payload
            .as_u64()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| self.choices.get(index as usize));

        match picked {
            Some(choice) => {
                ctx.set_activity(ActivityFlag::Inactive);
                ctx.fire(&choice.output);
            }
            None => {
                // Bad input keeps the prompt open instead of failing the task.
                log::warn!("Pick a number between 1 and {}", self.choices.len());
            }
        }
        Ok(())
    }

    fn start_triggers(&mut self) -> Vec<&mut StartTrigger> {
        vec![&mut self.input]
    }

    fn end_triggers(&mut self) -> Vec<&mut EndTrigger> {
        self.choices
            .iter_mut()
            .map(|choice| &mut choice.output)
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Register the demo task kinds.
pub fn register(registry: &mut TaskRegistry) {
    registry.register::<Dialogue>("vn/dialogue");
    registry.register::<ChoicePrompt>("vn/choice");
}
