//! StoryTool - branching story graph engine
//!
//! Author networks of story tasks connected by start/end triggers, keep
//! the trigger links consistent while editing, and execute the graph with
//! a synchronous cascade runner.

pub mod core;
pub mod tasks;

// Re-exports
pub use self::core::{
    ActivityFlag, GraphController, LinkId, PortRef, StoryGraph, StoryRunner, StoryTask,
    TaskContext, TaskRegistry,
};

/// Result type alias
pub type Result<T> = anyhow::Result<T>;
