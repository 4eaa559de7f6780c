//! Room-to-room travel times.
//!
//! Maps (room, room) → number of slots a student needs to walk between them.
//! Used by the attendee-adjacency rule and by student conflict counting: two
//! back-to-back classes in distant rooms clash even though their slot ranges
//! do not overlap.
//!
//! The matrix is an explicit value built once per problem instance and shared
//! read-only by every evaluation, so several instances can coexist.

use serde::{Deserialize, Serialize};

use super::RoomId;
use crate::error::{Result, TimetableError};

/// Symmetric travel-time matrix over 1-based room ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTravelTime")]
pub struct TravelTime {
    /// Row-major `size × size` slots; `None` until initialized.
    slots: Option<Vec<u16>>,
    size: usize,
}

impl TravelTime {
    /// Creates an uninitialized matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matrix for `room_count` rooms with all travel times zero.
    pub fn with_rooms(room_count: usize) -> Self {
        Self {
            slots: Some(vec![0; room_count * room_count]),
            size: room_count,
        }
    }

    /// Sizes the matrix for `room_count` rooms.
    ///
    /// # Errors
    /// `AlreadyInitialized` on any call after the first.
    pub fn initialize(&mut self, room_count: usize) -> Result<()> {
        if self.slots.is_some() {
            return Err(TimetableError::AlreadyInitialized);
        }
        *self = Self::with_rooms(room_count);
        Ok(())
    }

    /// Whether the matrix has been sized.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.slots.is_some()
    }

    /// Number of rooms covered (0 before initialization).
    #[inline]
    pub fn room_count(&self) -> usize {
        self.size
    }

    fn offset(&self, from: RoomId, to: RoomId) -> Result<usize> {
        let check = |id: RoomId| {
            if id == 0 || id as usize > self.size {
                Err(TimetableError::IndexOutOfRange {
                    id,
                    size: self.size,
                })
            } else {
                Ok(id as usize - 1)
            }
        };
        Ok(check(from)? * self.size + check(to)?)
    }

    /// Slots needed to travel from room `from` to room `to`.
    pub fn get(&self, from: RoomId, to: RoomId) -> Result<u16> {
        let slots = self.slots.as_ref().ok_or(TimetableError::NotInitialized)?;
        Ok(slots[self.offset(from, to)?])
    }

    /// Sets the travel time between two rooms in both directions.
    pub fn set(&mut self, from: RoomId, to: RoomId, value: u16) -> Result<()> {
        let forward = self.offset(from, to);
        let backward = self.offset(to, from);
        let slots = self.slots.as_mut().ok_or(TimetableError::NotInitialized)?;
        slots[forward?] = value;
        slots[backward?] = value;
        Ok(())
    }

    /// Builder: sets a travel time and returns self.
    pub fn with_travel(mut self, from: RoomId, to: RoomId, value: u16) -> Result<Self> {
        self.set(from, to, value)?;
        Ok(self)
    }
}

#[derive(Deserialize)]
struct RawTravelTime {
    slots: Option<Vec<u16>>,
    size: usize,
}

impl TryFrom<RawTravelTime> for TravelTime {
    type Error = TimetableError;

    /// Accepts only what [`TravelTime::with_rooms`] and [`TravelTime::set`]
    /// can produce: a square, symmetric matrix, or nothing at all.
    fn try_from(raw: RawTravelTime) -> Result<Self> {
        let Some(slots) = raw.slots else {
            if raw.size != 0 {
                return Err(TimetableError::construction(
                    "travel time",
                    format!("uninitialized matrix claims {} rooms", raw.size),
                ));
            }
            return Ok(Self::new());
        };
        let size = raw.size;
        if size.checked_mul(size) != Some(slots.len()) {
            return Err(TimetableError::construction(
                "travel time",
                format!("{} entries do not form a {size} x {size} matrix", slots.len()),
            ));
        }
        for from in 0..size {
            for to in from + 1..size {
                if slots[from * size + to] != slots[to * size + from] {
                    return Err(TimetableError::construction(
                        "travel time",
                        format!("rooms {} and {} differ by direction", from + 1, to + 1),
                    ));
                }
            }
        }
        Ok(Self {
            slots: Some(slots),
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_symmetric() {
        let mut tt = TravelTime::with_rooms(3);
        tt.set(1, 3, 6).unwrap();
        assert_eq!(tt.get(1, 3), Ok(6));
        assert_eq!(tt.get(3, 1), Ok(6));
        assert_eq!(tt.get(2, 3), Ok(0));
        assert_eq!(tt.get(2, 2), Ok(0));
    }

    #[test]
    fn test_initialize_once() {
        let mut tt = TravelTime::new();
        assert!(!tt.is_initialized());
        assert_eq!(tt.get(1, 1), Err(TimetableError::NotInitialized));
        assert_eq!(tt.set(1, 1, 2), Err(TimetableError::NotInitialized));

        tt.initialize(2).unwrap();
        assert!(tt.is_initialized());
        assert_eq!(tt.room_count(), 2);
        assert_eq!(tt.initialize(5), Err(TimetableError::AlreadyInitialized));
        assert_eq!(tt.room_count(), 2);
    }

    #[test]
    fn test_out_of_range_ids() {
        let tt = TravelTime::with_rooms(2);
        assert_eq!(
            tt.get(0, 1),
            Err(TimetableError::IndexOutOfRange { id: 0, size: 2 })
        );
        assert_eq!(
            tt.get(1, 3),
            Err(TimetableError::IndexOutOfRange { id: 3, size: 2 })
        );

        let mut tt = tt;
        assert!(tt.set(3, 1, 4).is_err());
        assert_eq!(tt.get(1, 1), Ok(0));
    }

    #[test]
    fn test_independent_instances() {
        let a = TravelTime::with_rooms(2).with_travel(1, 2, 3).unwrap();
        let b = TravelTime::with_rooms(2).with_travel(1, 2, 9).unwrap();
        assert_eq!(a.get(2, 1), Ok(3));
        assert_eq!(b.get(2, 1), Ok(9));
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let tt = TravelTime::with_rooms(2).with_travel(1, 2, 4).unwrap();
        let json = serde_json::to_string(&tt).unwrap();
        assert_eq!(serde_json::from_str::<TravelTime>(&json).unwrap(), tt);
        let empty: TravelTime = serde_json::from_str(r#"{"slots":null,"size":0}"#).unwrap();
        assert!(!empty.is_initialized());

        // Too few entries would panic on lookup.
        assert!(serde_json::from_str::<TravelTime>(r#"{"slots":[],"size":3}"#).is_err());
        assert!(serde_json::from_str::<TravelTime>(r#"{"slots":null,"size":2}"#).is_err());
        assert!(serde_json::from_str::<TravelTime>(r#"{"slots":[0,1,2,0],"size":2}"#).is_err());
    }
}
