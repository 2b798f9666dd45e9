// src/plan/schema.rs
use serde::{Deserialize, Serialize};

/// One node of a plan file.
///
/// A node with `tasks`, `mode` or `type` describes a group, anything else a
/// single task. Workers are referenced by registry name; `params` is
/// deserialized straight into the worker parameter type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "P: Deserialize<'de>"))]
pub struct PlanNode<P> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<P>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Legacy spelling of `mode`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub legacy_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<PlanNode<P>>>,
}

impl<P> PlanNode<P> {
    pub fn is_group(&self) -> bool {
        self.tasks.is_some() || self.mode.is_some() || self.legacy_type.is_some()
    }

    /// Number of groups and tasks in this subtree, this node included
    pub fn stats(&self) -> PlanStats {
        let mut stats = PlanStats::default();
        self.count(&mut stats);
        stats
    }

    fn count(&self, stats: &mut PlanStats) {
        if !self.is_group() {
            stats.tasks += 1;
            return;
        }
        stats.groups += 1;
        for child in self.tasks.iter().flatten() {
            child.count(stats);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanStats {
    pub groups: usize,
    pub tasks: usize,
}
