//! Event: a class together with its current placement.
//!
//! An event is the mutable, schedulable counterpart of a [`Class`]. It starts
//! empty, receives a time and (if the class needs one) a room, and records the
//! students enrolled in it. Many events for the same class can coexist, one
//! per candidate timetable.
//!
//! # State Machine
//!
//! ```text
//! Unassigned ──assign_time──▶ TimeAssigned ──assign_room──▶ Scheduled   (room required)
//! Unassigned ──assign_time──▶ Scheduled                                  (no room needed)
//! ```
//!
//! Reassignment is allowed at any point; every assignment returns the penalty
//! delta against the previous one so callers can keep a running total in O(1).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Class, ClassId, RoomAssignment, RoomId, StudentId, Time, TimeAssignment};
use crate::error::{AssignmentKind, Result, TimetableError};

/// Placement progress of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventState {
    /// Neither time nor room assigned.
    Unassigned,
    /// Time assigned; the class still needs a room.
    TimeAssigned,
    /// Room assigned but no time yet.
    RoomAssigned,
    /// Time assigned, and room assigned if the class needs one.
    Scheduled,
}

/// A class with its current time/room assignment and enrolled students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    class: Arc<Class>,
    time: Option<TimeAssignment>,
    room: Option<RoomAssignment>,
    students: Vec<StudentId>,
}

fn delta(new: u32, old: Option<u32>) -> i64 {
    i64::from(new) - old.map_or(0, i64::from)
}

impl Event {
    /// Creates an unassigned event for `class`.
    pub fn new(class: Arc<Class>) -> Self {
        Self {
            class,
            time: None,
            room: None,
            students: Vec::new(),
        }
    }

    /// The class being scheduled.
    #[inline]
    pub fn class(&self) -> &Class {
        &self.class
    }

    #[inline]
    pub fn class_id(&self) -> ClassId {
        self.class.id()
    }

    /// Current time assignment.
    pub fn time_assignment(&self) -> Option<&TimeAssignment> {
        self.time.as_ref()
    }

    /// Current room assignment. Always `None` for classes that need no room.
    pub fn room_assignment(&self) -> Option<&RoomAssignment> {
        self.room.as_ref()
    }

    /// Enrolled students, in enrollment order.
    pub fn students(&self) -> &[StudentId] {
        &self.students
    }

    /// Enrolls a student. Sectioning rules are the caller's responsibility.
    pub fn add_student(&mut self, student: StudentId) {
        self.students.push(student);
    }

    /// The assigned time, or `Unassigned` if none.
    pub fn time(&self) -> Result<&Time> {
        self.time
            .as_ref()
            .map(TimeAssignment::time)
            .ok_or_else(|| TimetableError::Unassigned {
                class_id: self.class_id(),
                kind: AssignmentKind::Time,
            })
    }

    /// The assigned room id.
    ///
    /// `Ok(None)` for a class that needs no room; `Unassigned` for a class that
    /// needs one but has none yet.
    pub fn room_id(&self) -> Result<Option<RoomId>> {
        match (&self.room, self.class.requires_room()) {
            (Some(ra), _) => Ok(Some(ra.room().id())),
            (None, false) => Ok(None),
            (None, true) => Err(TimetableError::Unassigned {
                class_id: self.class_id(),
                kind: AssignmentKind::Room,
            }),
        }
    }

    /// Assigns a time after checking it is one of the class's legal times.
    ///
    /// The membership scan is O(n) in the number of legal times. Use
    /// [`Self::assign_time_unchecked`] to skip it when the candidate is known
    /// to come from [`Class::possible_times`].
    ///
    /// # Returns
    /// The candidate's penalty on first assignment, otherwise
    /// `new.penalty - old.penalty`.
    ///
    /// # Errors
    /// `NotFeasible` if the candidate is not a legal time; the event is unchanged.
    pub fn assign_time(&mut self, candidate: TimeAssignment) -> Result<i64> {
        if !self.class.is_legal_time(&candidate) {
            return Err(TimetableError::NotFeasible {
                class_id: self.class_id(),
                kind: AssignmentKind::Time,
            });
        }
        Ok(self.assign_time_unchecked(candidate))
    }

    /// Assigns a time in O(1) without the legality check.
    ///
    /// An illegal candidate is installed silently and later evaluation will
    /// treat it as a real placement.
    pub fn assign_time_unchecked(&mut self, candidate: TimeAssignment) -> i64 {
        let d = delta(candidate.penalty(), self.time.as_ref().map(TimeAssignment::penalty));
        trace!(class_id = self.class_id(), delta = d, "time assigned");
        self.time = Some(candidate);
        d
    }

    /// Assigns a room after checking it is one of the class's legal rooms.
    ///
    /// Same contract as [`Self::assign_time`]. A class that needs no room has
    /// no legal rooms, so every candidate fails with `NotFeasible`.
    pub fn assign_room(&mut self, candidate: RoomAssignment) -> Result<i64> {
        if !self.class.is_legal_room(&candidate) {
            return Err(TimetableError::NotFeasible {
                class_id: self.class_id(),
                kind: AssignmentKind::Room,
            });
        }
        Ok(self.assign_room_unchecked(candidate))
    }

    /// Assigns a room in O(1) without the legality check.
    pub fn assign_room_unchecked(&mut self, candidate: RoomAssignment) -> i64 {
        let d = delta(candidate.penalty(), self.room.as_ref().map(RoomAssignment::penalty));
        trace!(class_id = self.class_id(), delta = d, "room assigned");
        self.room = Some(candidate);
        d
    }

    /// Whether the time is assigned and, if the class needs one, the room too.
    pub fn is_scheduled(&self) -> bool {
        self.time.is_some() && (!self.class.requires_room() || self.room.is_some())
    }

    /// Current placement progress.
    pub fn state(&self) -> EventState {
        match (&self.time, &self.room) {
            _ if self.is_scheduled() => EventState::Scheduled,
            (Some(_), _) => EventState::TimeAssigned,
            (None, Some(_)) => EventState::RoomAssigned,
            (None, None) => EventState::Unassigned,
        }
    }

    /// Penalty of the current time assignment (0 if none).
    pub fn time_penalty(&self) -> u32 {
        self.time.as_ref().map_or(0, TimeAssignment::penalty)
    }

    /// Penalty of the current room assignment (0 if none).
    pub fn room_penalty(&self) -> u32 {
        self.room.as_ref().map_or(0, RoomAssignment::penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Room;

    fn ta(start: u16, penalty: u32) -> TimeAssignment {
        TimeAssignment::new(Time::parse("1", "1000000", start, 12).unwrap(), penalty)
    }

    fn roomless_class() -> Arc<Class> {
        Arc::new(Class::new(1, 10, vec![ta(0, 3), ta(24, 7), ta(48, 1)]).unwrap())
    }

    fn ra(id: u32, penalty: u32) -> RoomAssignment {
        RoomAssignment::new(Arc::new(Room::new(id, 50).unwrap()), penalty)
    }

    fn roomed_class() -> Arc<Class> {
        Arc::new(
            Class::new(2, 10, vec![ta(0, 0)])
                .unwrap()
                .with_rooms(vec![ra(1, 4), ra(2, 0)]),
        )
    }

    #[test]
    fn test_time_assignment_deltas() {
        let mut e = Event::new(roomless_class());
        assert_eq!(e.state(), EventState::Unassigned);

        assert_eq!(e.assign_time(ta(24, 7)).unwrap(), 7);
        assert_eq!(e.assign_time(ta(48, 1)).unwrap(), -6);
        assert_eq!(e.assign_time(ta(0, 3)).unwrap(), 2);
        assert_eq!(e.time_penalty(), 3);
        assert_eq!(e.time().unwrap().start(), 0);
    }

    #[test]
    fn test_illegal_time_is_rejected() {
        let mut e = Event::new(roomless_class());
        e.assign_time(ta(0, 3)).unwrap();
        let err = e.assign_time(ta(100, 0)).unwrap_err();
        assert_eq!(
            err,
            TimetableError::NotFeasible {
                class_id: 1,
                kind: AssignmentKind::Time
            }
        );
        // Previous assignment survives.
        assert_eq!(e.time().unwrap().start(), 0);
    }

    #[test]
    fn test_unchecked_assignment_skips_membership() {
        let mut e = Event::new(roomless_class());
        assert_eq!(e.assign_time_unchecked(ta(100, 5)), 5);
        assert_eq!(e.time().unwrap().start(), 100);
    }

    #[test]
    fn test_roomless_class_scheduling() {
        let mut e = Event::new(roomless_class());
        assert!(!e.is_scheduled());
        assert_eq!(e.room_id(), Ok(None));
        e.assign_time(ta(0, 3)).unwrap();
        assert!(e.is_scheduled());
        assert_eq!(e.state(), EventState::Scheduled);

        let err = e.assign_room(ra(1, 4)).unwrap_err();
        assert!(matches!(
            err,
            TimetableError::NotFeasible {
                kind: AssignmentKind::Room,
                ..
            }
        ));
    }

    #[test]
    fn test_room_required_state_machine() {
        let mut e = Event::new(roomed_class());
        assert!(matches!(
            e.room_id(),
            Err(TimetableError::Unassigned {
                kind: AssignmentKind::Room,
                ..
            })
        ));
        assert!(e.time().is_err());

        e.assign_time(ta(0, 0)).unwrap();
        assert_eq!(e.state(), EventState::TimeAssigned);
        assert!(!e.is_scheduled());

        assert_eq!(e.assign_room(ra(1, 4)).unwrap(), 4);
        assert_eq!(e.state(), EventState::Scheduled);
        assert_eq!(e.assign_room(ra(2, 0)).unwrap(), -4);
        assert_eq!(e.room_id(), Ok(Some(2)));
        assert!(e.assign_room(ra(3, 0)).is_err());
    }

    #[test]
    fn test_room_before_time() {
        let mut e = Event::new(roomed_class());
        e.assign_room(ra(2, 0)).unwrap();
        assert_eq!(e.state(), EventState::RoomAssigned);
    }

    #[test]
    fn test_students_keep_order() {
        let mut e = Event::new(roomless_class());
        e.add_student(5);
        e.add_student(2);
        assert_eq!(e.students(), &[5, 2]);
    }
}
