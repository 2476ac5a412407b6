//! Core engine - graph model, trigger links, synchronization, execution

mod controller;
mod graph;
mod registry;
mod runner;
mod task;
mod trigger;

pub use controller::{GraphController, GraphEditError, PortRef};
pub use graph::{CommentRect, GraphComment, Metadata, NodePosition, StoryGraph, TaskEntry};
pub use registry::TaskRegistry;
pub use runner::{StoryRunner, TaskContext};
pub use task::{ActivityFlag, StoryTask};
pub use trigger::{EndTrigger, LinkId, StartTrigger};
