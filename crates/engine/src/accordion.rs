//! Expanded/collapsed state over the whole registry.
//!
//! At most one command is expanded at a time. Activating a collapsed command
//! collapses the expanded one (if any) and expands it; activating the
//! expanded command collapses it.

use hllrcon_types::CommandId;

/// What changed as a result of one activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub collapsed: Option<CommandId>,
    pub expanded: Option<CommandId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    expanded: Option<CommandId>,
}

impl Accordion {
    /// All commands collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expanded(&self) -> Option<CommandId> {
        self.expanded
    }

    pub fn is_expanded(&self, id: CommandId) -> bool {
        self.expanded == Some(id)
    }

    pub fn activate(&mut self, id: CommandId) -> Transition {
        match self.expanded {
            Some(current) if current == id => {
                self.expanded = None;
                Transition {
                    collapsed: Some(id),
                    expanded: None,
                }
            }
            previous => {
                self.expanded = Some(id);
                Transition {
                    collapsed: previous,
                    expanded: Some(id),
                }
            }
        }
    }

    pub fn collapse_all(&mut self) -> Transition {
        Transition {
            collapsed: self.expanded.take(),
            expanded: None,
        }
    }
}
