//! Timetable (candidate solution) model.
//!
//! A timetable holds one [`Event`] per class in a dense array: the event of
//! class `k` lives at index `k - 1`, so class ids of an instance must be
//! exactly `1..=n` (checked by [`crate::validation`]). A slot is set once and
//! never overwritten; the events inside it stay mutable so a search can move
//! classes around.
//!
//! Timetables are independent values. Concurrent searches should give every
//! unit of work its own clone; there is no internal synchronization.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Class, ClassId, Event};
use crate::error::{Result, TimetableError};

/// A complete or partial assignment of events to classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimetable")]
pub struct Timetable {
    events: Vec<Option<Event>>,
}

impl Timetable {
    /// Creates an empty timetable for `class_count` classes.
    pub fn new(class_count: usize) -> Self {
        Self {
            events: vec![None; class_count],
        }
    }

    /// Creates a timetable with one unassigned event per class.
    ///
    /// # Errors
    /// `IndexOutOfRange` if a class id exceeds the number of classes,
    /// `DuplicateSlot` if two classes share an id.
    pub fn from_classes<'a>(classes: impl ExactSizeIterator<Item = &'a Arc<Class>>) -> Result<Self> {
        let mut timetable = Self::new(classes.len());
        for class in classes {
            timetable.set_event(Event::new(Arc::clone(class)))?;
        }
        Ok(timetable)
    }

    /// Number of class slots.
    #[inline]
    pub fn class_count(&self) -> usize {
        self.events.len()
    }

    fn index(&self, class_id: ClassId) -> Result<usize> {
        if class_id == 0 || class_id as usize > self.events.len() {
            return Err(TimetableError::IndexOutOfRange {
                id: class_id,
                size: self.events.len(),
            });
        }
        Ok(class_id as usize - 1)
    }

    /// Places an event in the slot of its class.
    ///
    /// # Errors
    /// `DuplicateSlot` if the slot is already occupied; the timetable is unchanged.
    pub fn set_event(&mut self, event: Event) -> Result<()> {
        let class_id = event.class_id();
        let index = self.index(class_id)?;
        let slot = &mut self.events[index];
        if slot.is_some() {
            return Err(TimetableError::DuplicateSlot { class_id });
        }
        *slot = Some(event);
        Ok(())
    }

    /// The event of a class.
    ///
    /// # Errors
    /// `MissingEvent` if the slot was never set.
    pub fn event(&self, class_id: ClassId) -> Result<&Event> {
        let index = self.index(class_id)?;
        self.events[index]
            .as_ref()
            .ok_or(TimetableError::MissingEvent { class_id })
    }

    /// Mutable access to the event of a class, for (re)assignment.
    pub fn event_mut(&mut self, class_id: ClassId) -> Result<&mut Event> {
        let index = self.index(class_id)?;
        self.events[index]
            .as_mut()
            .ok_or(TimetableError::MissingEvent { class_id })
    }

    /// All events that have been set, in class-id order.
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().flatten()
    }

    /// Ids of classes whose slot has not been set.
    pub fn missing_events(&self) -> Vec<ClassId> {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_none())
            .map(|(i, _)| i as ClassId + 1)
            .collect()
    }

    /// Set events that are not yet scheduled.
    pub fn unscheduled_events(&self) -> Vec<&Event> {
        self.events().filter(|e| !e.is_scheduled()).collect()
    }

    /// Whether every slot holds an event.
    pub fn is_complete(&self) -> bool {
        self.events.iter().all(Option::is_some)
    }

    /// Whether the timetable is complete and every event is scheduled.
    pub fn is_scheduled(&self) -> bool {
        self.events
            .iter()
            .all(|e| e.as_ref().is_some_and(Event::is_scheduled))
    }

    /// Sum of the penalties of all current time assignments.
    pub fn time_penalty(&self) -> u64 {
        self.events().map(|e| u64::from(e.time_penalty())).sum()
    }

    /// Sum of the penalties of all current room assignments.
    pub fn room_penalty(&self) -> u64 {
        self.events().map(|e| u64::from(e.room_penalty())).sum()
    }

    /// Time plus room assignment penalties.
    pub fn assignment_penalty(&self) -> u64 {
        self.time_penalty() + self.room_penalty()
    }
}

#[derive(Deserialize)]
struct RawTimetable {
    events: Vec<Option<Event>>,
}

impl TryFrom<RawTimetable> for Timetable {
    type Error = TimetableError;

    /// Every stored event must sit in the slot of its own class.
    fn try_from(raw: RawTimetable) -> Result<Self> {
        let mut timetable = Self::new(raw.events.len());
        for (index, event) in raw.events.into_iter().enumerate() {
            let Some(event) = event else { continue };
            if event.class_id() as usize != index + 1 {
                return Err(TimetableError::construction(
                    "timetable",
                    format!("event of class {} stored in slot {}", event.class_id(), index + 1),
                ));
            }
            timetable.set_event(event)?;
        }
        Ok(timetable)
    }
}
