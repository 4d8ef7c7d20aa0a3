//! Event storage.
//!
//! `EventStore` is the repository the view layer is handed. Stores only
//! ever deal in base events: anything done to an occurrence goes through
//! its `target_id()`.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use chrono::NaiveDate;

use crate::date_range::DateRange;
use crate::error::{HubCalError, HubCalResult};
use crate::event::{BaseEvent, Occurrence, RecurringType, Reminder};
use crate::recurrence::{parse_occurrence_id, try_expand_event};

pub trait EventStore {
    /// All base events belonging to `owner_id`, in creation order.
    fn list(&self, owner_id: &str) -> HubCalResult<Vec<BaseEvent>>;

    fn get(&self, id: &str) -> HubCalResult<BaseEvent>;

    /// Store a new event under a freshly generated id.
    fn create(&mut self, new: NewEvent) -> HubCalResult<BaseEvent>;

    /// Apply `patch` to the event `id` and return the result.
    fn update(&mut self, id: &str, patch: EventPatch) -> HubCalResult<BaseEvent>;

    fn delete(&mut self, id: &str) -> HubCalResult<()>;
}

/// Fields of an event that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub owner_id: String,
    pub title: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub all_day: bool,
    pub is_recurring: bool,
    pub recurring_type: Option<RecurringType>,
    pub recurring_until: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub reminder: Option<Reminder>,
}

impl NewEvent {
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        start_date: impl Into<String>,
    ) -> Self {
        NewEvent {
            owner_id: owner_id.into(),
            title: title.into(),
            start_date: start_date.into(),
            end_date: None,
            start_time: None,
            end_time: None,
            all_day: false,
            is_recurring: false,
            recurring_type: None,
            recurring_until: None,
            color: None,
            category: None,
            location: None,
            description: None,
            reminder: None,
        }
    }

    /// Make this a recurring series.
    pub fn repeating(mut self, recurring_type: RecurringType, until: Option<String>) -> Self {
        self.is_recurring = true;
        self.recurring_type = Some(recurring_type);
        self.recurring_until = until;
        self
    }

    pub(crate) fn into_event(self, id: String) -> BaseEvent {
        BaseEvent {
            id,
            owner_id: self.owner_id,
            title: self.title,
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            all_day: self.all_day,
            is_recurring: self.is_recurring,
            recurring_type: self.recurring_type,
            recurring_until: self.recurring_until,
            color: self.color,
            category: self.category,
            location: self.location,
            description: self.description,
            reminder: self.reminder,
        }
    }
}

/// A partial update. `None` leaves a field alone; for optional fields,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<Option<String>>,
    pub start_time: Option<Option<String>>,
    pub end_time: Option<Option<String>>,
    pub all_day: Option<bool>,
    pub is_recurring: Option<bool>,
    pub recurring_type: Option<Option<RecurringType>>,
    pub recurring_until: Option<Option<String>>,
    pub color: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub reminder: Option<Option<Reminder>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }

    pub fn apply(self, event: &mut BaseEvent) {
        fn set<T>(field: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *field = v;
            }
        }

        set(&mut event.title, self.title);
        set(&mut event.start_date, self.start_date);
        set(&mut event.end_date, self.end_date);
        set(&mut event.start_time, self.start_time);
        set(&mut event.end_time, self.end_time);
        set(&mut event.all_day, self.all_day);
        set(&mut event.is_recurring, self.is_recurring);
        set(&mut event.recurring_type, self.recurring_type);
        set(&mut event.recurring_until, self.recurring_until);
        set(&mut event.color, self.color);
        set(&mut event.category, self.category);
        set(&mut event.location, self.location);
        set(&mut event.description, self.description);
        set(&mut event.reminder, self.reminder);
    }
}

/// Update the base event behind `occurrence`.
///
/// Changing one occurrence changes the whole series; the synthetic
/// occurrence id is never sent to the store.
pub fn update_occurrence(
    store: &mut dyn EventStore,
    occurrence: &Occurrence,
    patch: EventPatch,
) -> HubCalResult<BaseEvent> {
    store.update(occurrence.target_id(), patch)
}

/// Delete the base event behind `occurrence` (the whole series).
pub fn delete_occurrence(store: &mut dyn EventStore, occurrence: &Occurrence) -> HubCalResult<()> {
    store.delete(occurrence.target_id())
}

/// Resolve an id given by a user to the id of a stored base event.
///
/// Accepts a base id, or a synthetic occurrence id as long as the base
/// event really has an occurrence on the encoded date.
pub fn resolve_target_id(
    store: &dyn EventStore,
    id: &str,
    today: NaiveDate,
) -> HubCalResult<String> {
    match store.get(id) {
        Ok(event) => return Ok(event.id),
        Err(HubCalError::EventNotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let not_found = || HubCalError::EventNotFound(id.to_string());
    let (base_id, date) = parse_occurrence_id(id).ok_or_else(not_found)?;
    let base = match store.get(base_id) {
        Ok(event) => event,
        Err(HubCalError::EventNotFound(_)) => return Err(not_found()),
        Err(e) => return Err(e),
    };

    let occurrences = try_expand_event(&base, &DateRange::single_day(date), today)?;
    occurrences
        .iter()
        .find(|o| o.id == id)
        .map(|o| o.target_id().to_string())
        .ok_or_else(not_found)
}
