//! Story point - base wrapper for synchronous behaviors
//!
//! A point is a line whose effect always completes inline: run the
//! behavior, then fire the end trigger. If the behavior errors, the task
//! fails and the end trigger does not fire, halting that branch.

use crate::core::{ActivityFlag, EndTrigger, StartTrigger, StoryTask, TaskContext};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Effect carried by a [`StoryPoint`]. Runs to completion inline.
pub trait PointBehavior: fmt::Debug {
    fn execute(&mut self) -> Result<()>;
}

/// One-input/one-output task wrapping a [`PointBehavior`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoryPoint<B> {
    #[serde(default)]
    pub start: StartTrigger,
    #[serde(default)]
    pub end: EndTrigger,
    #[serde(flatten)]
    pub behavior: B,
}

impl<B> StoryTask for StoryPoint<B>
where
    B: PointBehavior + 'static,
{
    fn on_triggered(&mut self, _port: usize, ctx: &mut TaskContext<'_>) -> Result<()> {
        ctx.set_activity(ActivityFlag::Active);
        self.behavior.execute()?;
        ctx.set_activity(ActivityFlag::Inactive);
        ctx.fire(&self.end);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LinkId, NodePosition, StoryGraph, StoryRunner};
    use crate::tasks::StartTask;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Tally {
        count: Rc<RefCell<usize>>,
        fail: bool,
    }

    impl PointBehavior for Tally {
        fn execute(&mut self) -> Result<()> {
            if self.fail {
                anyhow::bail!("effect failed");
            }
            *self.count.borrow_mut() += 1;
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Counter {
        input: StartTrigger,
        count: Rc<RefCell<usize>>,
    }

    impl StoryTask for Counter {
        fn on_triggered(&mut self, _port: usize, _ctx: &mut TaskContext<'_>) -> Result<()> {
            *self.count.borrow_mut() += 1;
            Ok(())
        }

        fn start_triggers(&mut self) -> Vec<&mut StartTrigger> {
            vec![&mut self.input]
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn point_graph(fail: bool) -> (StoryGraph, Rc<RefCell<usize>>, Rc<RefCell<usize>>) {
        let mut graph = StoryGraph::new();
        graph.add_task(
            "builtin/start",
            Box::new(StartTask {
                output: EndTrigger::linked(LinkId(1)),
            }),
            NodePosition::default(),
        );
        let effects = Rc::new(RefCell::new(0));
        graph.add_task(
            "test/tally",
            Box::new(StoryPoint {
                start: StartTrigger::linked(LinkId(1)),
                end: EndTrigger::linked(LinkId(2)),
                behavior: Tally {
                    count: effects.clone(),
                    fail,
                },
            }),
            NodePosition::default(),
        );
        let downstream = Rc::new(RefCell::new(0));
        graph.add_task(
            "test/counter",
            Box::new(Counter {
                input: StartTrigger::linked(LinkId(2)),
                count: downstream.clone(),
            }),
            NodePosition::default(),
        );
        (graph, effects, downstream)
    }

    #[test]
    fn test_point_runs_inline_and_continues() {
        let (graph, effects, downstream) = point_graph(false);
        let mut runner = StoryRunner::new(graph);
        runner.run().unwrap();
        assert_eq!(*effects.borrow(), 1);
        assert_eq!(*downstream.borrow(), 1);
        assert_eq!(runner.activity(1), Some(ActivityFlag::Inactive));
    }

    #[test]
    fn test_failing_point_halts_its_branch() {
        let (graph, effects, downstream) = point_graph(true);
        let mut runner = StoryRunner::new(graph);
        runner.run().unwrap();
        assert_eq!(*effects.borrow(), 0);
        assert_eq!(*downstream.borrow(), 0, "end trigger must not fire");
        assert_eq!(runner.activity(1), Some(ActivityFlag::Failed));
    }
}
