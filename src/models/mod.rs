//! Timetabling domain models.
//!
//! Provides the static catalog of an instance (courses, classes, rooms,
//! students, legal placements) and the mutable state of a candidate solution
//! (events and timetables). Field ranges follow the ITC 2019 format.
//!
//! # Domain Mappings
//!
//! | u-timetable | ITC 2019 |
//! |-------------|----------|
//! | Class | `<class>` with its `<room>`/`<time>` candidates |
//! | Room | `<room>` with `<unavailable>` periods |
//! | TravelTime | `<travel>` elements of all rooms |
//! | Event | `<class>` of a `<solution>` |
//! | Timetable | `<solution>` |

mod bits;
mod class;
mod course;
mod event;
mod room;
mod time;
mod timetable;
mod travel;

pub use bits::Bits;
pub use class::Class;
pub use course::{Course, CourseConfig, Student, Subpart};
pub use event::{Event, EventState};
pub use room::{Room, RoomAssignment};
pub use time::{Time, TimeAssignment, MAX_DAYS, SLOTS_PER_DAY};
pub use timetable::Timetable;
pub use travel::TravelTime;

/// Class identifier (1-based, dense within an instance).
pub type ClassId = u32;
/// Room identifier (1-based).
pub type RoomId = u32;
/// Course identifier.
pub type CourseId = u32;
/// Course configuration identifier.
pub type ConfigId = u32;
/// Subpart identifier.
pub type SubpartId = u32;
/// Student identifier.
pub type StudentId = u32;
