//! Registry events for change detection.
//!
//! The registry pushes one event per identity mutation into a buffer the
//! host drains once per frame. Every event carries the unit `Arc` itself,
//! so a consumer draining after the fact can still query a unit that has
//! already left the registry's indices.

use std::fmt;
use std::sync::Arc;

use lodestone_core::HashedString;

use crate::id::UnitId;
use crate::unit::{AssetUnit, AssetUnitExt};

/// Events emitted by an asset unit registry.
#[derive(Clone)]
pub enum UnitEvent {
    /// A unit was registered.
    Added {
        /// The registered unit.
        unit: Arc<dyn AssetUnit>,
    },

    /// A unit is being unregistered.
    Removing {
        /// The unit leaving the registry. Still queryable through this
        /// reference even though the indices no longer hold it.
        unit: Arc<dyn AssetUnit>,
    },

    /// A registered unit changed its id.
    IdChanged {
        /// The affected unit.
        unit: Arc<dyn AssetUnit>,
        /// The id before the change.
        old_id: Option<UnitId>,
        /// The id after the change.
        new_id: Option<UnitId>,
    },

    /// A registered unit changed its name.
    NameChanged {
        /// The affected unit.
        unit: Arc<dyn AssetUnit>,
        /// The name before the change.
        old_name: HashedString,
        /// The name after the change.
        new_name: HashedString,
    },
}

impl UnitEvent {
    /// The unit this event relates to.
    pub fn unit(&self) -> &Arc<dyn AssetUnit> {
        match self {
            UnitEvent::Added { unit } => unit,
            UnitEvent::Removing { unit } => unit,
            UnitEvent::IdChanged { unit, .. } => unit,
            UnitEvent::NameChanged { unit, .. } => unit,
        }
    }

    /// Check if this is a registration event.
    pub fn is_added(&self) -> bool {
        matches!(self, UnitEvent::Added { .. })
    }

    /// Check if this is an unregistration event.
    pub fn is_removing(&self) -> bool {
        matches!(self, UnitEvent::Removing { .. })
    }

    /// Check if this is an id change event.
    pub fn is_id_changed(&self) -> bool {
        matches!(self, UnitEvent::IdChanged { .. })
    }

    /// Check if this is a name change event.
    pub fn is_name_changed(&self) -> bool {
        matches!(self, UnitEvent::NameChanged { .. })
    }
}

impl fmt::Debug for UnitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitEvent::Added { unit } => f
                .debug_struct("Added")
                .field("kind", &unit.kind())
                .field("id", &unit.id())
                .finish(),
            UnitEvent::Removing { unit } => f
                .debug_struct("Removing")
                .field("kind", &unit.kind())
                .field("id", &unit.id())
                .finish(),
            UnitEvent::IdChanged { old_id, new_id, .. } => f
                .debug_struct("IdChanged")
                .field("old_id", old_id)
                .field("new_id", new_id)
                .finish(),
            UnitEvent::NameChanged {
                old_name, new_name, ..
            } => f
                .debug_struct("NameChanged")
                .field("old_name", old_name)
                .field("new_name", new_name)
                .finish(),
        }
    }
}

/// A buffer of registry events drained each frame.
#[derive(Default)]
pub struct UnitEventBuffer {
    events: Vec<UnitEvent>,
}

impl UnitEventBuffer {
    /// Create a new empty event buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event to the buffer.
    pub fn push(&mut self, event: UnitEvent) {
        self.events.push(event);
    }

    /// Take all buffered events, leaving the buffer empty.
    pub fn drain_all(&mut self) -> Vec<UnitEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get an iterator over events without draining.
    pub fn iter(&self) -> impl Iterator<Item = &UnitEvent> {
        self.events.iter()
    }

    /// Check if there are any events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get the number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Clear all events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
