//! Error types for timetable construction, assignment, and evaluation.
//!
//! Every failure in this crate reflects a violated precondition on data that
//! should already be valid. Errors are surfaced immediately and never retried.

use std::fmt;

use thiserror::Error;

use crate::models::ClassId;

/// Which half of an event's placement an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentKind {
    /// The time assignment.
    Time,
    /// The room assignment.
    Room,
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time => f.write_str("time"),
            Self::Room => f.write_str("room"),
        }
    }
}

/// Main error type for timetable operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimetableError {
    /// An entity was constructed from out-of-range data.
    #[error("invalid {entity}: {reason}")]
    Construction {
        entity: &'static str,
        reason: String,
    },

    /// The candidate is not among the class's precomputed legal assignments.
    #[error("class {class_id}: {kind} assignment is not among the legal candidates")]
    NotFeasible { class_id: ClassId, kind: AssignmentKind },

    /// Two bit-vectors of different widths were combined.
    #[error("bit-vector width mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// A first-meeting lookup was made on an all-zero bit-vector.
    #[error("no meeting defined: bit-vector has no set bit")]
    NoMeetingDefined,

    /// The timetable slot for this class is already occupied.
    #[error("timetable already holds an event for class {class_id}")]
    DuplicateSlot { class_id: ClassId },

    /// The travel-time matrix was initialized twice.
    #[error("travel-time matrix is already initialized")]
    AlreadyInitialized,

    /// The travel-time matrix was read before initialization.
    #[error("travel-time matrix is not initialized")]
    NotInitialized,

    /// A 1-based id falls outside the indexed collection.
    #[error("id {id} is out of range 1..={size}")]
    IndexOutOfRange { id: u32, size: usize },

    /// A timetable slot was read before an event was set.
    #[error("no event has been set for class {class_id}")]
    MissingEvent { class_id: ClassId },

    /// A rule needs an assignment the event does not have yet.
    #[error("class {class_id} has no {kind} assigned")]
    Unassigned { class_id: ClassId, kind: AssignmentKind },

    /// A bit string contained something other than '0' and '1'.
    #[error("invalid bit string '{input}'")]
    InvalidBitString { input: String },

    /// A distribution rule token could not be decoded.
    #[error("invalid distribution rule '{input}': {reason}")]
    InvalidRuleSpec { input: String, reason: String },
}

impl TimetableError {
    pub(crate) fn construction(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::Construction {
            entity,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;
