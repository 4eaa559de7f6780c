//! Class model.
//!
//! A class is the smallest schedulable unit: one section of one subpart of a
//! course. It lists every legal time (and, if it needs one, every legal room),
//! each with a penalty. Only rooms that are large enough and satisfy the
//! class's requirements are listed, so a placement is legal iff it is drawn
//! from these lists.
//!
//! # Parent Classes
//! A student attending a class must also attend its parent. The parent is
//! stored by id; that it belongs to the same course is checked once at load
//! time (see [`crate::validation`]).

use serde::{Deserialize, Serialize};

use super::{ClassId, RoomAssignment, TimeAssignment};
use crate::error::{Result, TimetableError};

/// A class to be placed in time and, optionally, in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClass")]
pub struct Class {
    id: ClassId,
    limit: u32,
    /// `None` when the class needs no room.
    rooms: Option<Vec<RoomAssignment>>,
    times: Vec<TimeAssignment>,
    parent: Option<ClassId>,
}

impl Class {
    /// Creates a class that needs no room.
    ///
    /// # Errors
    /// `Construction` if `id` is 0 or `times` is empty.
    pub fn new(id: ClassId, limit: u32, times: Vec<TimeAssignment>) -> Result<Self> {
        if id == 0 {
            return Err(TimetableError::construction("class", "id must be at least 1"));
        }
        if times.is_empty() {
            return Err(TimetableError::construction(
                "class",
                format!("class {id} has no possible time assignments"),
            ));
        }
        Ok(Self {
            id,
            limit,
            rooms: None,
            times,
            parent: None,
        })
    }

    /// Sets the legal rooms, marking the class as needing a room.
    pub fn with_rooms(mut self, rooms: Vec<RoomAssignment>) -> Self {
        self.rooms = Some(rooms);
        self
    }

    /// Sets the parent class.
    pub fn with_parent(mut self, parent: ClassId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Unique class id.
    #[inline]
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Maximum number of students.
    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Legal rooms, or `None` if the class needs no room.
    pub fn possible_rooms(&self) -> Option<&[RoomAssignment]> {
        self.rooms.as_deref()
    }

    /// Legal times.
    pub fn possible_times(&self) -> &[TimeAssignment] {
        &self.times
    }

    /// Parent class id.
    #[inline]
    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    /// Whether a room must be assigned for this class to be scheduled.
    #[inline]
    pub fn requires_room(&self) -> bool {
        self.rooms.is_some()
    }

    /// Whether `candidate` is one of the legal times. O(n).
    pub fn is_legal_time(&self, candidate: &TimeAssignment) -> bool {
        self.times.contains(candidate)
    }

    /// Whether `candidate` is one of the legal rooms. O(n).
    ///
    /// Always `false` for a class that needs no room.
    pub fn is_legal_room(&self, candidate: &RoomAssignment) -> bool {
        self.rooms
            .as_ref()
            .is_some_and(|rooms| rooms.contains(candidate))
    }
}

#[derive(Deserialize)]
struct RawClass {
    id: ClassId,
    limit: u32,
    rooms: Option<Vec<RoomAssignment>>,
    times: Vec<TimeAssignment>,
    parent: Option<ClassId>,
}

impl TryFrom<RawClass> for Class {
    type Error = TimetableError;

    fn try_from(raw: RawClass) -> Result<Self> {
        let mut class = Self::new(raw.id, raw.limit, raw.times)?;
        class.rooms = raw.rooms;
        class.parent = raw.parent;
        Ok(class)
    }
}
