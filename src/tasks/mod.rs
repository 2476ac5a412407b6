//! Built-in story task variants
//!
//! The standard vocabulary for authoring story graphs:
//! - [`StartTask`] - graph entry point
//! - [`BranchTask`] - 1→N fan-out, reusable
//! - [`WhenAllTask`] - N→1 fan-in barrier, fires once
//! - [`WhenAnyTask`] - N→1 race, fires once
//! - [`AnyTask`] - N→1 relay, fires every time
//! - [`StoryLine`] / [`StoryPoint`] - base wrappers for custom behaviors
//! - [`LogPoint`] - emit a log record as a story step

mod any;
mod branch;
mod line;
mod log_point;
mod point;
mod start;
mod when_all;
mod when_any;

pub use any::AnyTask;
pub use branch::BranchTask;
pub use line::{LineBehavior, LineOutcome, StoryLine};
pub use log_point::{LogLevel, LogMessage, LogPoint};
pub use point::{PointBehavior, StoryPoint};
pub use start::StartTask;
pub use when_all::{StartTriggerWithFlag, WhenAllTask};
pub use when_any::WhenAnyTask;

use crate::core::TaskRegistry;

/// Register every built-in task kind.
pub fn register_builtins(registry: &mut TaskRegistry) {
    registry.register::<StartTask>("builtin/start");
    registry.register::<BranchTask>("builtin/branch");
    registry.register::<WhenAllTask>("builtin/when_all");
    registry.register::<WhenAnyTask>("builtin/when_any");
    registry.register::<AnyTask>("builtin/any");
    registry.register::<LogPoint>("builtin/log");
}
