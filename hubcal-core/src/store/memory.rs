//! In-memory event store.

use uuid::Uuid;

use super::{EventPatch, EventStore, NewEvent};
use crate::error::{HubCalError, HubCalResult};
use crate::event::BaseEvent;

/// Event store holding its records in an owned list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Vec<BaseEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records, e.g. ones loaded from disk.
    pub fn with_events(events: Vec<BaseEvent>) -> Self {
        MemoryStore { events }
    }

    /// Every record regardless of owner.
    pub fn events(&self) -> &[BaseEvent] {
        &self.events
    }

    fn position(&self, id: &str) -> HubCalResult<usize> {
        self.events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| HubCalError::EventNotFound(id.to_string()))
    }
}

impl EventStore for MemoryStore {
    fn list(&self, owner_id: &str) -> HubCalResult<Vec<BaseEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn get(&self, id: &str) -> HubCalResult<BaseEvent> {
        let index = self.position(id)?;
        Ok(self.events[index].clone())
    }

    fn create(&mut self, new: NewEvent) -> HubCalResult<BaseEvent> {
        let event = new.into_event(Uuid::new_v4().to_string());
        self.events.push(event.clone());
        Ok(event)
    }

    fn update(&mut self, id: &str, patch: EventPatch) -> HubCalResult<BaseEvent> {
        let index = self.position(id)?;
        let event = &mut self.events[index];
        patch.apply(event);
        Ok(event.clone())
    }

    fn delete(&mut self, id: &str) -> HubCalResult<()> {
        let index = self.position(id)?;
        self.events.remove(index);
        Ok(())
    }
}
