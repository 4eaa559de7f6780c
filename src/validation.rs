//! Load-time integrity checks for timetabling instances.
//!
//! Runs once after an instance is assembled and before any timetable is
//! evaluated. Detects:
//! - Duplicate IDs (rooms, courses, configurations, subparts, classes, students)
//! - Class IDs that are not exactly `1..=n`
//! - Parents that are missing or belong to another course
//! - Room candidates and requirements referencing unknown entities
//! - Times whose week/day vectors do not match the configured term
//! - A travel matrix that does not cover the registered rooms
//!
//! Every detected issue is returned, not just the first.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::models::{ClassId, CourseId, Time};
use crate::problem::Problem;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// Class IDs leave a gap or exceed the class count.
    NonContiguousClassIds,
    /// A parent class is unknown or offered by a different course.
    InvalidParent,
    /// A room candidate references a room that is not registered.
    InvalidRoomReference,
    /// A student demands a course that does not exist.
    InvalidCourseReference,
    /// A requirement lists a class that does not exist.
    InvalidClassReference,
    /// A time does not match the configured number of weeks or days.
    GeometryMismatch,
    /// The travel matrix is uninitialized or sized for another room count.
    TravelMatrixMismatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Default)]
struct Report {
    errors: Vec<ValidationError>,
}

impl Report {
    fn push(&mut self, kind: ValidationErrorKind, message: String) {
        warn!(?kind, %message, "validation issue");
        self.errors.push(ValidationError::new(kind, message));
    }

    fn check_unique<I: Copy + Eq + std::hash::Hash + std::fmt::Display>(
        &mut self,
        entity: &str,
        ids: impl IntoIterator<Item = I>,
    ) -> HashSet<I> {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                self.push(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate {entity} ID: {id}"),
                );
            }
        }
        seen
    }

    fn check_geometry(&mut self, owner: &str, time: &Time, nr_weeks: usize, nr_days: usize) {
        if time.weeks().width() != nr_weeks || time.days().width() != nr_days {
            self.push(
                ValidationErrorKind::GeometryMismatch,
                format!(
                    "{owner} has a time with {} weeks and {} days, expected {nr_weeks} and {nr_days}",
                    time.weeks().width(),
                    time.days().width()
                ),
            );
        }
    }

    fn finish(self) -> ValidationResult {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Validates a timetabling instance.
///
/// Checks:
/// 1. No duplicate room, course, configuration, subpart, class or student IDs
/// 2. Class IDs are exactly `1..=n` (timetables index events by class ID)
/// 3. Every parent exists and belongs to the same course as its child
/// 4. Every room candidate references a registered room
/// 5. Every class time and room unavailability matches the configured term
/// 6. Students demand existing courses; requirements list existing classes
/// 7. The travel matrix is initialized for exactly the registered rooms
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(problem: &Problem) -> ValidationResult {
    let mut report = Report::default();
    let geometry = problem.config().geometry;

    let room_ids = report.check_unique("room", problem.rooms().iter().map(|r| r.id()));
    let course_ids = report.check_unique("course", problem.courses().iter().map(|c| c.id()));
    report.check_unique(
        "config",
        problem
            .courses()
            .iter()
            .flat_map(|c| c.configs())
            .map(|c| c.id()),
    );
    report.check_unique(
        "subpart",
        problem
            .courses()
            .iter()
            .flat_map(|c| c.configs())
            .flat_map(|c| c.subparts())
            .map(|s| s.id()),
    );
    let class_ids = report.check_unique("class", problem.classes().map(|c| c.id()));
    report.check_unique("student", problem.students().iter().map(|s| s.id()));

    let class_count = class_ids.len();
    let mut beyond: Vec<ClassId> = class_ids
        .iter()
        .copied()
        .filter(|&id| id as usize > class_count)
        .collect();
    if !beyond.is_empty() {
        beyond.sort_unstable();
        report.push(
            ValidationErrorKind::NonContiguousClassIds,
            format!("Class IDs {beyond:?} exceed the class count {class_count}"),
        );
    }

    let mut course_of: HashMap<ClassId, CourseId> = HashMap::new();
    for course in problem.courses() {
        for class in course.classes() {
            course_of.insert(class.id(), course.id());
        }
    }

    for course in problem.courses() {
        for class in course.classes() {
            let owner = format!("Class {}", class.id());

            if let Some(parent) = class.parent() {
                match course_of.get(&parent) {
                    None => report.push(
                        ValidationErrorKind::InvalidParent,
                        format!("{owner} references unknown parent {parent}"),
                    ),
                    Some(&other) if other != course.id() => report.push(
                        ValidationErrorKind::InvalidParent,
                        format!(
                            "{owner} of course {} has parent {parent} from course {other}",
                            course.id()
                        ),
                    ),
                    Some(_) => {}
                }
            }

            for candidate in class.possible_rooms().unwrap_or_default() {
                let room = candidate.room().id();
                if !room_ids.contains(&room) {
                    report.push(
                        ValidationErrorKind::InvalidRoomReference,
                        format!("{owner} references unknown room {room}"),
                    );
                }
            }

            for candidate in class.possible_times() {
                report.check_geometry(&owner, candidate.time(), geometry.nr_weeks, geometry.nr_days);
            }
        }
    }

    for room in problem.rooms() {
        let owner = format!("Room {}", room.id());
        for time in room.unavailable() {
            report.check_geometry(&owner, time, geometry.nr_weeks, geometry.nr_days);
        }
    }

    for student in problem.students() {
        for course in student.courses() {
            if !course_ids.contains(course) {
                report.push(
                    ValidationErrorKind::InvalidCourseReference,
                    format!("Student {} demands unknown course {course}", student.id()),
                );
            }
        }
    }

    for (index, requirement) in problem.requirements().iter().enumerate() {
        let constraint = requirement.constraint();
        for class in constraint.classes() {
            if !class_ids.contains(class) {
                report.push(
                    ValidationErrorKind::InvalidClassReference,
                    format!(
                        "Requirement #{index} ({}) lists unknown class {class}",
                        constraint.rule()
                    ),
                );
            }
        }
    }

    let travel = problem.travel();
    if !problem.rooms().is_empty() || travel.is_initialized() {
        if !travel.is_initialized() {
            report.push(
                ValidationErrorKind::TravelMatrixMismatch,
                format!("Travel matrix is not initialized for {} rooms", room_ids.len()),
            );
        } else if travel.room_count() != problem.rooms().len() {
            report.push(
                ValidationErrorKind::TravelMatrixMismatch,
                format!(
                    "Travel matrix covers {} rooms, {} are registered",
                    travel.room_count(),
                    problem.rooms().len()
                ),
            );
        }
    }

    report.finish()
}
