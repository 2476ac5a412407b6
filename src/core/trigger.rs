//! Triggers - the activation ports that connect story tasks
//!
//! An `EndTrigger` (output port) and a `StartTrigger` (input port) are
//! connected when both carry the same `LinkId`. The id is the whole link:
//! the subscriber list that makes a link observable at runtime lives in the
//! `StoryRunner`, keyed by id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one trigger link within a graph.
///
/// Every `StartTrigger` owns exactly one id and at most one `EndTrigger`
/// references it; `GraphController::sync_trigger_links` repairs any
/// violation of that shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inbound activation port of a story task.
///
/// A start trigger with no link is an authoring-in-progress state; the
/// synchronizer assigns it a fresh link on its next pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartTrigger {
    /// Link this port listens on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkId>,
}

impl StartTrigger {
    /// Create a start trigger listening on the given link.
    pub fn linked(link: LinkId) -> Self {
        Self { link: Some(link) }
    }
}

/// Outbound activation port of a story task.
///
/// An end trigger with no link is a valid authoring state (an unconnected
/// output); firing it is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndTrigger {
    /// Link this port fires, if connected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkId>,
}

impl EndTrigger {
    /// Create an end trigger firing the given link.
    pub fn linked(link: LinkId) -> Self {
        Self { link: Some(link) }
    }

    /// Whether this output is connected to anything.
    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_id_roundtrip() {
        let trigger = EndTrigger::linked(LinkId(7));
        let yaml = serde_yaml::to_string(&trigger).unwrap();
        let back: EndTrigger = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, trigger);
    }

    #[test]
    fn test_unlinked_by_default() {
        assert_eq!(StartTrigger::default().link, None);
        assert!(!EndTrigger::default().is_linked());
    }

    #[test]
    fn test_missing_link_field_decodes_as_unlinked() {
        let trigger: StartTrigger = serde_yaml::from_str("{}").unwrap();
        assert_eq!(trigger.link, None);
    }
}
