//! Element id allocation.
//!
//! Each dropdown needs stable DOM ids for its trigger and panel. Ids come from
//! an [`IdGenerator`] handed to the constructor, so two independent sets of
//! dropdowns (or two test cases) never share a counter.

use std::cell::Cell;
use std::fmt;

use serde::Serialize;

/// Numeric identity of a dropdown instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DropdownId(u64);

impl DropdownId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DropdownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source.
#[derive(Debug)]
pub struct IdGenerator {
    next: Cell<u64>,
}

impl IdGenerator {
    /// Generator whose first id is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Cell::new(first),
        }
    }

    pub fn next_id(&self) -> DropdownId {
        let id = self.next.get();
        self.next.set(id + 1);
        DropdownId(id)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// DOM ids of the two elements a dropdown manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownIds {
    pub trigger: String,
    pub panel: String,
}

impl DropdownIds {
    /// Default ids derived from the instance id.
    pub fn for_id(id: DropdownId) -> Self {
        Self {
            trigger: format!("dropdown-trigger-{}", id),
            panel: format!("dropdown-content-{}", id),
        }
    }

    /// Replace the defaults with any explicit ids.
    pub fn with_overrides(mut self, trigger: Option<&str>, panel: Option<&str>) -> Self {
        if let Some(trigger) = trigger {
            self.trigger = trigger.to_string();
        }
        if let Some(panel) = panel {
            self.panel = panel.to_string();
        }
        self
    }
}
