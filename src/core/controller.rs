//! Graph controller - trigger link synchronization and editing operations
//!
//! The controller is the editor-facing surface of a story graph. Every
//! structural edit (task created, tasks removed, ports re-linked) goes
//! through it, and every mutating operation ends with a
//! `sync_trigger_links` pass so the link invariants hold at all times:
//!
//! 1. every start trigger owns exactly one link, unique among starts;
//! 2. every linked end trigger references some start's link;
//! 3. at most one end trigger references a given link (first claim wins,
//!    in collection order);
//! 4. end triggers referencing an orphaned link are cleared.

use crate::core::graph::{GraphComment, NodePosition, StoryGraph, TaskEntry};
use crate::core::registry::TaskRegistry;
use crate::core::task::ActivityFlag;
use crate::core::trigger::LinkId;
use anyhow::Result;
use std::collections::HashSet;
use thiserror::Error;

/// Invalid-argument conditions raised by graph editing operations.
/// These fail immediately and are never retried.
#[derive(Debug, Error)]
pub enum GraphEditError {
    #[error("task index {index} is out of range ({len} tasks in graph)")]
    TaskIndex { index: usize, len: usize },
    #[error("comment index {index} is out of range ({len} comments in graph)")]
    CommentIndex { index: usize, len: usize },
    #[error("task {task} has no start trigger port {port}")]
    StartPort { task: usize, port: usize },
    #[error("task {task} has no end trigger port {port}")]
    EndPort { task: usize, port: usize },
    #[error("start trigger {task}:{port} has no link assigned; run sync_trigger_links first")]
    UnsyncedStart { task: usize, port: usize },
}

/// Address of one trigger port: a task index plus the port's position in
/// the task's trigger declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRef {
    pub task: usize,
    pub port: usize,
}

impl PortRef {
    pub fn new(task: usize, port: usize) -> Self {
        Self { task, port }
    }
}

/// Editing surface over a story graph.
pub struct GraphController<'a> {
    graph: &'a mut StoryGraph,
    registry: &'a TaskRegistry,
}

impl<'a> GraphController<'a> {
    /// Create a controller over a graph.
    pub fn new(graph: &'a mut StoryGraph, registry: &'a TaskRegistry) -> Self {
        Self { graph, registry }
    }

    /// Synchronize trigger link references across all story tasks.
    ///
    /// Call after tasks or triggers have been added, removed or modified.
    /// The pass removes duplicate or dangling link claims from end
    /// triggers, hands every start trigger a unique link, and clears end
    /// triggers whose link no start owns. Duplicate end claims are resolved
    /// first-claim-wins in collection order (which is also the execution
    /// order). Running the pass twice without an intervening mutation is a
    /// no-op; the return value is the number of repaired references.
    pub fn sync_trigger_links(&mut self) -> usize {
        let mut repaired = 0;

        // Fresh ids are allocated above every id present anywhere in the
        // graph at pass start, so a dangling end claim can never alias a
        // link minted later in the same pass.
        let mut next_id = self.max_link_id().map_or(1, |LinkId(id)| id + 1);

        // Pass 1: end triggers claim their links, first claim wins.
        let mut claimed: HashSet<LinkId> = HashSet::new();
        for (index, entry) in self.graph.tasks.iter_mut().enumerate() {
            for end in entry.task.end_triggers() {
                if let Some(link) = end.link {
                    if !claimed.insert(link) {
                        log::warn!(
                            "Task {} holds a duplicate claim on link {}; clearing",
                            index,
                            link
                        );
                        end.link = None;
                        repaired += 1;
                    }
                }
            }
        }

        // Pass 2: start triggers take ownership; unset or duplicated links
        // are replaced with a fresh one.
        let mut owned: HashSet<LinkId> = HashSet::new();
        for entry in self.graph.tasks.iter_mut() {
            for start in entry.task.start_triggers() {
                match start.link {
                    Some(link) if owned.insert(link) => {}
                    previous => {
                        let fresh = LinkId(next_id);
                        next_id += 1;
                        if let Some(link) = previous {
                            log::warn!(
                                "Start trigger duplicates link {}; assigning fresh link {}",
                                link,
                                fresh
                            );
                        }
                        start.link = Some(fresh);
                        owned.insert(fresh);
                        repaired += 1;
                    }
                }
            }
        }

        // Pass 3: clear end triggers whose link no start owns.
        for (index, entry) in self.graph.tasks.iter_mut().enumerate() {
            for end in entry.task.end_triggers() {
                if let Some(link) = end.link {
                    if !owned.contains(&link) {
                        log::warn!(
                            "Task {} references orphaned link {}; clearing",
                            index,
                            link
                        );
                        end.link = None;
                        repaired += 1;
                    }
                }
            }
        }

        repaired
    }

    /// Create a new task of a registered kind at a position, appended to
    /// the end of the collection. Returns the new task's index.
    pub fn create_task(&mut self, kind: &str, position: NodePosition) -> Result<usize> {
        let task = self.registry.create(kind)?;
        let index = self.graph.tasks.len();
        self.graph.tasks.push(TaskEntry {
            kind: kind.to_string(),
            position,
            activity: ActivityFlag::Inactive,
            task,
        });
        self.sync_trigger_links();
        Ok(index)
    }

    /// Remove a set of tasks by index. The whole call is validated before
    /// any task is removed. Returns the number of tasks removed.
    pub fn remove_tasks(&mut self, indices: &[usize]) -> Result<usize> {
        let len = self.graph.tasks.len();
        for &index in indices {
            if index >= len {
                return Err(GraphEditError::TaskIndex { index, len }.into());
            }
        }

        // Descending order so earlier removals do not shift later indices.
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &index in sorted.iter().rev() {
            self.graph.tasks.remove(index);
        }

        self.sync_trigger_links();
        Ok(sorted.len())
    }

    /// Connect an end trigger to a start trigger's link.
    ///
    /// The start trigger must already own a link; the previous link of the
    /// end trigger, if any, is replaced. Re-syncing afterwards enforces the
    /// one-end-per-link invariant against the rest of the graph.
    pub fn link(&mut self, end: PortRef, start: PortRef) -> Result<()> {
        let link = {
            let entry = Self::entry_mut(self.graph, start.task)?;
            let mut starts = entry.task.start_triggers();
            let trigger = starts.get_mut(start.port).ok_or(GraphEditError::StartPort {
                task: start.task,
                port: start.port,
            })?;
            trigger.link.ok_or(GraphEditError::UnsyncedStart {
                task: start.task,
                port: start.port,
            })?
        };

        let entry = Self::entry_mut(self.graph, end.task)?;
        let mut ends = entry.task.end_triggers();
        let trigger = ends.get_mut(end.port).ok_or(GraphEditError::EndPort {
            task: end.task,
            port: end.port,
        })?;
        trigger.link = Some(link);

        self.sync_trigger_links();
        Ok(())
    }

    /// Clear an end trigger's link.
    pub fn unlink(&mut self, end: PortRef) -> Result<()> {
        let entry = Self::entry_mut(self.graph, end.task)?;
        let mut ends = entry.task.end_triggers();
        let trigger = ends.get_mut(end.port).ok_or(GraphEditError::EndPort {
            task: end.task,
            port: end.port,
        })?;
        trigger.link = None;
        Ok(())
    }

    /// Move a task node to a new position.
    pub fn set_node_position(&mut self, task: usize, position: NodePosition) -> Result<()> {
        let entry = Self::entry_mut(self.graph, task)?;
        entry.position = position;
        Ok(())
    }

    /// Create a default-sized comment at a position. Returns its index.
    pub fn create_comment(&mut self, position: NodePosition) -> usize {
        self.graph.comments.push(GraphComment::at(position));
        self.graph.comments.len() - 1
    }

    /// Remove a set of comments by index. Returns the number removed.
    pub fn remove_comments(&mut self, indices: &[usize]) -> Result<usize> {
        let len = self.graph.comments.len();
        for &index in indices {
            if index >= len {
                return Err(GraphEditError::CommentIndex { index, len }.into());
            }
        }

        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &index in sorted.iter().rev() {
            self.graph.comments.remove(index);
        }
        Ok(sorted.len())
    }

    /// Largest link id present on any trigger, start or end.
    fn max_link_id(&mut self) -> Option<LinkId> {
        let mut max = None;
        for entry in self.graph.tasks.iter_mut() {
            for start in entry.task.start_triggers() {
                if start.link > max {
                    max = start.link;
                }
            }
            for end in entry.task.end_triggers() {
                if end.link > max {
                    max = end.link;
                }
            }
        }
        max
    }

    fn entry_mut(graph: &mut StoryGraph, index: usize) -> Result<&mut TaskEntry, GraphEditError> {
        let len = graph.tasks.len();
        graph
            .tasks
            .get_mut(index)
            .ok_or(GraphEditError::TaskIndex { index, len })
    }
}
