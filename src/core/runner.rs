//! Story runner - two-phase startup and synchronous trigger dispatch
//!
//! The runner consumes a `StoryGraph` and drives it on a single thread.
//! Startup happens in two ordered phases: the awake phase wires every
//! start-trigger subscription and runs the `on_awake` hooks (no triggers
//! fire here), then the start phase runs the `on_start` hooks, where
//! entry-point tasks fire their outputs. Firing a link recurses directly
//! into every subscriber on the calling thread; a cascade runs to
//! completion before control returns.
//!
//! Faults are isolated per task: a hook that returns an error is logged,
//! the task is marked `Failed` (terminal), and sibling subscribers and the
//! outer loops keep going.

use crate::core::graph::StoryGraph;
use crate::core::task::{ActivityFlag, StoryTask};
use crate::core::trigger::{EndTrigger, LinkId};
use anyhow::Result;
use std::collections::HashMap;

/// One wired start-trigger subscription.
#[derive(Debug, Clone, Copy)]
struct Subscriber {
    task: usize,
    port: usize,
}

/// Runtime slot for one task.
#[derive(Debug)]
struct TaskSlot {
    kind: String,
    activity: ActivityFlag,
    /// Taken out of the slot while the task's own hook runs, which doubles
    /// as the re-entrancy guard for cyclic graphs.
    task: Option<Box<dyn StoryTask>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loaded,
    Awake,
    Started,
}

/// Executes a story graph.
pub struct StoryRunner {
    slots: Vec<TaskSlot>,
    subscribers: HashMap<LinkId, Vec<Subscriber>>,
    phase: Phase,
}

impl StoryRunner {
    /// Create a runner over a graph. Every task starts `Inactive`
    /// regardless of the activity recorded in the loaded document.
    pub fn new(graph: StoryGraph) -> Self {
        let slots = graph
            .tasks
            .into_iter()
            .map(|entry| TaskSlot {
                kind: entry.kind,
                activity: ActivityFlag::Inactive,
                task: Some(entry.task),
            })
            .collect();

        Self {
            slots,
            subscribers: HashMap::new(),
            phase: Phase::Loaded,
        }
    }

    /// Awake phase: wire start-trigger subscriptions and run every task's
    /// `on_awake` hook, in collection order. Must be called exactly once,
    /// before `start`.
    pub fn awake(&mut self) -> Result<()> {
        if self.phase != Phase::Loaded {
            anyhow::bail!("awake phase has already run");
        }

        for index in 0..self.slots.len() {
            let mut task = self.slots[index].task.take().expect("slot is filled");

            for (port, trigger) in task.start_triggers().into_iter().enumerate() {
                match trigger.link {
                    Some(link) => {
                        self.subscribers
                            .entry(link)
                            .or_default()
                            .push(Subscriber { task: index, port });
                    }
                    None => log::warn!(
                        "Task {} ({}) input port {} is not linked",
                        index,
                        self.slots[index].kind,
                        port
                    ),
                }
            }

            task.on_awake();
            self.slots[index].task = Some(task);
        }

        self.phase = Phase::Awake;
        Ok(())
    }

    /// Start phase: run every task's `on_start` hook, in collection order.
    /// Trigger cascades started here run to completion synchronously
    /// before the loop advances to the next task.
    pub fn start(&mut self) -> Result<()> {
        if self.phase != Phase::Awake {
            anyhow::bail!("start phase requires the awake phase to have run first");
        }
        self.phase = Phase::Started;

        for index in 0..self.slots.len() {
            let Some(mut task) = self.slots[index].task.take() else {
                continue;
            };
            let result = task.on_start(&mut TaskContext {
                runner: &mut *self,
                index,
            });
            self.slots[index].task = Some(task);
            if let Err(err) = result {
                self.fail(index, &err);
            }
        }

        Ok(())
    }

    /// Run both startup phases back to back.
    pub fn run(&mut self) -> Result<()> {
        self.awake()?;
        self.start()
    }

    /// Deliver a host payload to a task waiting on a deferred effect.
    ///
    /// Task faults are isolated exactly as during trigger dispatch; only
    /// invalid usage (unknown index, graph not running) is an error.
    pub fn resume(&mut self, index: usize, payload: serde_json::Value) -> Result<()> {
        if self.phase != Phase::Started {
            anyhow::bail!("cannot resume a task before the graph is running");
        }
        let len = self.slots.len();
        if index >= len {
            anyhow::bail!("task index {} is out of range ({} tasks)", index, len);
        }
        if self.slots[index].activity == ActivityFlag::Failed {
            log::debug!("Ignoring resume for failed task {}", index);
            return Ok(());
        }
        let Some(mut task) = self.slots[index].task.take() else {
            anyhow::bail!("task {} is currently dispatching", index);
        };

        let result = task.on_resume(payload, &mut TaskContext {
            runner: &mut *self,
            index,
        });
        self.slots[index].task = Some(task);
        if let Err(err) = result {
            self.fail(index, &err);
        }
        Ok(())
    }

    /// Current activity of a task.
    pub fn activity(&self, index: usize) -> Option<ActivityFlag> {
        self.slots.get(index).map(|slot| slot.activity)
    }

    /// Activity of every task, in collection order.
    pub fn activities(&self) -> Vec<ActivityFlag> {
        self.slots.iter().map(|slot| slot.activity).collect()
    }

    /// Kind name of a task.
    pub fn kind(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|slot| slot.kind.as_str())
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the runner holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fire a link: invoke every subscriber in registration order, on the
    /// current call stack. Each subscriber's fault is isolated so sibling
    /// branches still run.
    fn fire_link(&mut self, link: LinkId) {
        let subscribers = self.subscribers.get(&link).cloned().unwrap_or_default();
        for subscriber in subscribers {
            if self.slots[subscriber.task].activity == ActivityFlag::Failed {
                log::debug!(
                    "Skipping trigger for failed task {} ({})",
                    subscriber.task,
                    self.slots[subscriber.task].kind
                );
                continue;
            }
            let Some(mut task) = self.slots[subscriber.task].task.take() else {
                log::warn!(
                    "Task {} ({}) re-entered while dispatching; trigger ignored",
                    subscriber.task,
                    self.slots[subscriber.task].kind
                );
                continue;
            };

            let result = task.on_triggered(subscriber.port, &mut TaskContext {
                runner: &mut *self,
                index: subscriber.task,
            });
            self.slots[subscriber.task].task = Some(task);
            if let Err(err) = result {
                self.fail(subscriber.task, &err);
            }
        }
    }

    fn fail(&mut self, index: usize, err: &anyhow::Error) {
        self.slots[index].activity = ActivityFlag::Failed;
        log::error!(
            "Task {} ({}) failed: {:#}",
            index,
            self.slots[index].kind,
            err
        );
    }
}

/// Execution context handed to a task's hooks. Lets the task fire its end
/// triggers and maintain its own activity flag.
pub struct TaskContext<'r> {
    runner: &'r mut StoryRunner,
    index: usize,
}

impl TaskContext<'_> {
    /// Fire an end trigger. An unconnected trigger is a no-op, not an
    /// error. The cascade completes before this call returns.
    pub fn fire(&mut self, trigger: &EndTrigger) {
        match trigger.link {
            Some(link) => self.runner.fire_link(link),
            None => log::debug!("Unconnected end trigger fired by task {}", self.index),
        }
    }

    /// Set this task's activity flag.
    pub fn set_activity(&mut self, flag: ActivityFlag) {
        self.runner.slots[self.index].activity = flag;
    }

    /// This task's current activity flag.
    pub fn activity(&self) -> ActivityFlag {
        self.runner.slots[self.index].activity
    }

    /// This task's kind name, for diagnostics.
    pub fn kind(&self) -> &str {
        &self.runner.slots[self.index].kind
    }

    /// This task's index in the collection.
    pub fn index(&self) -> usize {
        self.index
    }
}
