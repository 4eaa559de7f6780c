//! Room model.
//!
//! A room has a capacity and a list of periods in which it cannot be used
//! (maintenance, other departments). Rooms are shared between classes through
//! [`RoomAssignment`]s, which pair a room with the penalty of using it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{RoomId, Time};
use crate::error::{Result, TimetableError};

/// A room that classes can be placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRoom")]
pub struct Room {
    id: RoomId,
    capacity: u32,
    unavailable: Vec<Time>,
}

impl Room {
    /// Creates a room that is always available.
    ///
    /// # Errors
    /// `Construction` if `id` is 0.
    pub fn new(id: RoomId, capacity: u32) -> Result<Self> {
        if id == 0 {
            return Err(TimetableError::construction("room", "id must be at least 1"));
        }
        Ok(Self {
            id,
            capacity,
            unavailable: Vec::new(),
        })
    }

    /// Adds an unavailable period.
    pub fn with_unavailable(mut self, time: Time) -> Self {
        self.unavailable.push(time);
        self
    }

    /// Unique room id.
    #[inline]
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Number of seats.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Periods in which the room cannot be used.
    pub fn unavailable(&self) -> &[Time] {
        &self.unavailable
    }

    /// Whether `time` avoids every unavailable period of this room.
    pub fn is_available_for(&self, time: &Time) -> Result<bool> {
        for blocked in &self.unavailable {
            if blocked.meets_with(time)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[derive(Deserialize)]
struct RawRoom {
    id: RoomId,
    capacity: u32,
    unavailable: Vec<Time>,
}

impl TryFrom<RawRoom> for Room {
    type Error = TimetableError;

    fn try_from(raw: RawRoom) -> Result<Self> {
        let mut room = Self::new(raw.id, raw.capacity)?;
        room.unavailable = raw.unavailable;
        Ok(room)
    }
}

/// A legal room for a class, with the penalty of choosing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAssignment {
    room: Arc<Room>,
    penalty: u32,
}

impl RoomAssignment {
    /// Creates a room assignment.
    pub fn new(room: Arc<Room>, penalty: u32) -> Self {
        Self { room, penalty }
    }

    /// The assigned room.
    #[inline]
    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Shared handle to the assigned room.
    pub fn room_arc(&self) -> &Arc<Room> {
        &self.room
    }

    /// Penalty of choosing this room.
    #[inline]
    pub fn penalty(&self) -> u32 {
        self.penalty
    }
}
