//! Story graph - ordered task collection with YAML persistence
//!
//! The graph owns its tasks; collection order is both the authoring order
//! and the order every runner and synchronizer pass iterates in. Task
//! payloads are serialized as self-describing records (`kind` + `config`)
//! resolved through a `TaskRegistry`.

use crate::core::registry::TaskRegistry;
use crate::core::task::{ActivityFlag, StoryTask};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Story graph metadata block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub story: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// Node position in graph space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub x: f32,
    pub y: f32,
}

impl NodePosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Position and size of a comment in graph space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Annotation note pinned to the graph canvas. Presentation-only: the
/// runner never looks at comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphComment {
    pub rect: CommentRect,
    pub title: String,
}

impl GraphComment {
    /// Default comment size in graph units.
    pub const DEFAULT_SIZE: (f32, f32) = (200.0, 160.0);

    /// Create a default-sized comment at a position.
    pub fn at(position: NodePosition) -> Self {
        Self {
            rect: CommentRect {
                x: position.x,
                y: position.y,
                width: Self::DEFAULT_SIZE.0,
                height: Self::DEFAULT_SIZE.1,
            },
            title: "Comment".to_string(),
        }
    }
}

/// One task slot in the graph: the task itself plus the bookkeeping the
/// graph keeps about it.
#[derive(Debug)]
pub struct TaskEntry {
    /// Registered kind name this task was created as.
    pub kind: String,
    /// Node position in graph space.
    pub position: NodePosition,
    /// Live activity state, for the presentation layer.
    pub activity: ActivityFlag,
    /// The task payload.
    pub task: Box<dyn StoryTask>,
}

/// Container owning an ordered collection of story tasks and comments.
#[derive(Debug, Default)]
pub struct StoryGraph {
    pub metadata: Option<Metadata>,
    pub tasks: Vec<TaskEntry>,
    pub comments: Vec<GraphComment>,
}

/// Serialized form of the graph document.
#[derive(Serialize, Deserialize)]
struct GraphDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
    #[serde(default)]
    tasks: Vec<TaskRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    comments: Vec<GraphComment>,
}

/// Serialized form of one task slot.
#[derive(Serialize, Deserialize)]
struct TaskRecord {
    kind: String,
    #[serde(default)]
    position: NodePosition,
    #[serde(default, skip_serializing_if = "ActivityFlag::is_inactive")]
    activity: ActivityFlag,
    #[serde(default)]
    config: serde_json::Value,
}

impl StoryGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a graph from a YAML file.
    pub fn from_file(path: &Path, registry: &TaskRegistry) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content, registry)
    }

    /// Parse a graph from a YAML document.
    pub fn from_yaml(yaml: &str, registry: &TaskRegistry) -> Result<Self> {
        let doc: GraphDoc = serde_yaml::from_str(yaml)?;

        let mut tasks = Vec::with_capacity(doc.tasks.len());
        for record in doc.tasks {
            let task = registry.decode(&record.kind, record.config)?;
            tasks.push(TaskEntry {
                kind: record.kind,
                position: record.position,
                activity: record.activity,
                task,
            });
        }

        Ok(Self {
            metadata: doc.metadata,
            tasks,
            comments: doc.comments,
        })
    }

    /// Serialize the graph to a YAML document.
    ///
    /// Output is deterministic: serializing the same graph twice yields
    /// byte-identical text.
    pub fn to_yaml(&self, registry: &TaskRegistry) -> Result<String> {
        let mut records = Vec::with_capacity(self.tasks.len());
        for entry in &self.tasks {
            records.push(TaskRecord {
                kind: entry.kind.clone(),
                position: entry.position,
                activity: entry.activity,
                config: registry.encode(&entry.kind, entry.task.as_ref())?,
            });
        }

        let doc = GraphDoc {
            metadata: self.metadata.clone(),
            tasks: records,
            comments: self.comments.clone(),
        };

        Ok(serde_yaml::to_string(&doc)?)
    }

    /// Save the graph to a YAML file.
    pub fn save(&self, path: &Path, registry: &TaskRegistry) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_yaml(registry)?)?;
        Ok(())
    }

    /// Append a task built in code (tests, static authoring). The kind name
    /// must match a registered kind for the graph to be saveable.
    pub fn add_task(
        &mut self,
        kind: impl Into<String>,
        task: Box<dyn StoryTask>,
        position: NodePosition,
    ) -> usize {
        self.tasks.push(TaskEntry {
            kind: kind.into(),
            position,
            activity: ActivityFlag::Inactive,
            task,
        });
        self.tasks.len() - 1
    }

    /// Number of tasks in the graph.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the graph has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
