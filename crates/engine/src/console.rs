use std::sync::Arc;

use hllrcon_registry::{CommandRegistry, MapCatalog};
use hllrcon_types::{Command, CommandId, OutboundRequest};
use tracing::debug;

use crate::accordion::{Accordion, Transition};
use crate::dispatch::{DispatchError, Dispatcher};
use crate::form::ControlSet;

/// Registry, accordion and the single live control set.
///
/// The control set exists only while its command is expanded: it is rendered
/// on expand and dropped on collapse, so reopening a command starts from
/// fresh controls.
#[derive(Debug, Clone)]
pub struct Console {
    registry: Arc<CommandRegistry>,
    accordion: Accordion,
    live: Option<ControlSet>,
    maps: MapCatalog,
}

impl Console {
    pub fn new(registry: Arc<CommandRegistry>, maps: MapCatalog) -> Self {
        Self {
            registry,
            accordion: Accordion::new(),
            live: None,
            maps,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn expanded(&self) -> Option<CommandId> {
        self.accordion.expanded()
    }

    pub fn expanded_command(&self) -> Option<&Command> {
        self.expanded().and_then(|id| self.registry.get(id))
    }

    pub fn controls(&self) -> Option<&ControlSet> {
        self.live.as_ref()
    }

    pub fn controls_mut(&mut self) -> Option<&mut ControlSet> {
        self.live.as_mut()
    }

    /// Toggle `id` through the accordion and rebuild the live control set.
    pub fn activate(&mut self, id: CommandId) -> Transition {
        let transition = self.accordion.activate(id);
        self.live = transition.expanded.and_then(|expanded| {
            let command = self.registry.get(expanded)?;
            let maps = self.maps.snapshot();
            Some(ControlSet::render(command, maps.as_deref()))
        });
        debug!(?transition, "accordion transition");
        transition
    }

    pub fn collapse_all(&mut self) -> Transition {
        self.live = None;
        self.accordion.collapse_all()
    }

    /// Back-fill pending map selectors of the live set from the catalog.
    pub fn apply_maps(&mut self) -> usize {
        match (self.live.as_mut(), self.maps.snapshot()) {
            (Some(set), Some(maps)) => set.backfill_maps(&maps),
            _ => 0,
        }
    }

    /// Prepare the expanded command's request. `None` when nothing is
    /// expanded.
    pub fn prepare(&self, dispatcher: &Dispatcher) -> Option<(CommandId, Result<OutboundRequest, DispatchError>)> {
        let id = self.expanded()?;
        let command = self.registry.get(id)?;
        let set = self.live.as_ref()?;
        Some((id, dispatcher.prepare(command, set)))
    }
}
