// src/engine/deprecation.rs
use std::collections::HashSet;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::warn;

/// Advisory notices for legacy spellings and shapes. None of them change
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deprecation {
    /// `type` used in place of `mode`
    TypeField,
    /// Group created with a single sub task
    SingleSubTask,
}

impl Deprecation {
    pub fn message(self) -> &'static str {
        match self {
            Self::TypeField => {
                "Use of \"type\" is deprecated and will be removed in next major release. Use \"mode\" instead."
            }
            Self::SingleSubTask => {
                "GroupTask must have at least a pair (2) of either Tasks, GroupTasks, or mix of them as it's subTasks. Support for < 2 subTasks is deprecated and will be removed in next major release."
            }
        }
    }
}

static EMITTED: Lazy<Mutex<HashSet<Deprecation>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Log `notice` the first time it is raised in this process.
///
/// Returns whether the notice was logged by this call.
pub fn deprecate(notice: Deprecation) -> bool {
    let first = EMITTED.lock().insert(notice);
    if first {
        warn!(target: "taskexec::deprecation", "{}", notice.message());
    }
    first
}

/// Whether `notice` has been raised at least once.
pub fn was_emitted(notice: Deprecation) -> bool {
    EMITTED.lock().contains(&notice)
}
