//! Problem instance registry.
//!
//! A [`Problem`] gathers everything an instance loader produces: rooms,
//! courses (and through them the classes), students, the travel matrix, the
//! distribution requirements and the configuration. It is built once and read
//! by every evaluation afterwards; timetables are created from it and
//! evaluated against it.
//!
//! # Examples
//!
//! ```
//! use u_timetable::config::TimetableConfig;
//! use u_timetable::distribution::{DistributionKind, Requirement};
//! use u_timetable::models::{Class, Course, CourseConfig, Subpart, Time, TimeAssignment};
//! use u_timetable::problem::Problem;
//!
//! let slot = |start| TimeAssignment::new(Time::parse("1", "1000000", start, 12).unwrap(), 0);
//! let subpart = Subpart::new(1).unwrap()
//!     .with_class(Class::new(1, 20, vec![slot(0), slot(12)]).unwrap())
//!     .with_class(Class::new(2, 20, vec![slot(0), slot(12)]).unwrap());
//! let course = Course::new(1).unwrap()
//!     .with_config(CourseConfig::new(1).unwrap().with_subpart(subpart));
//!
//! let problem = Problem::new("demo", TimetableConfig::new())
//!     .with_course(course)
//!     .with_requirement(Requirement::hard(DistributionKind::NotOverlap, vec![1, 2]));
//! assert!(problem.validate().is_ok());
//!
//! let mut timetable = problem.empty_timetable().unwrap();
//! timetable.event_mut(1).unwrap().assign_time(slot(0)).unwrap();
//! timetable.event_mut(2).unwrap().assign_time(slot(12)).unwrap();
//! assert!(problem.is_feasible(&timetable).unwrap());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TimetableConfig;
use crate::distribution::{HardConstraint, Requirement, SoftConstraint};
use crate::error::Result;
use crate::models::{
    Class, ClassId, Course, CourseId, Room, RoomId, Student, StudentId, Timetable, TravelTime,
};
use crate::validation::{validate_problem, ValidationResult};

/// A timetabling instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Problem {
    name: String,
    config: TimetableConfig,
    rooms: Vec<Arc<Room>>,
    courses: Vec<Course>,
    students: Vec<Student>,
    travel: TravelTime,
    requirements: Vec<Requirement>,
}

impl Problem {
    /// Creates an empty instance.
    pub fn new(name: impl Into<String>, config: TimetableConfig) -> Self {
        Self {
            name: name.into(),
            config,
            ..Self::default()
        }
    }

    /// Adds a room. Class room candidates should share this `Arc`.
    pub fn with_room(mut self, room: Arc<Room>) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    pub fn with_student(mut self, student: Student) -> Self {
        self.students.push(student);
        self
    }

    /// Sets the travel matrix.
    pub fn with_travel(mut self, travel: TravelTime) -> Self {
        self.travel = travel;
        self
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    pub fn rooms(&self) -> &[Arc<Room>] {
        &self.rooms
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn travel(&self) -> &TravelTime {
        &self.travel
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Every class of every course, in course order.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<Class>> + '_ {
        self.courses.iter().flat_map(|c| c.classes())
    }

    pub fn class_count(&self) -> usize {
        self.classes().count()
    }

    pub fn class(&self, id: ClassId) -> Option<&Arc<Class>> {
        self.classes().find(|c| c.id() == id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Arc<Room>> {
        self.rooms.iter().find(|r| r.id() == id)
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id() == id)
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id() == id)
    }

    /// The course offering a class.
    pub fn course_of(&self, class_id: ClassId) -> Option<&Course> {
        self.courses.iter().find(|c| c.contains_class(class_id))
    }

    /// Checks the integrity of the instance. See [`validate_problem`].
    pub fn validate(&self) -> ValidationResult {
        validate_problem(self)
    }

    /// A timetable with one unassigned event per class.
    ///
    /// # Errors
    /// `IndexOutOfRange` / `DuplicateSlot` if class ids are not exactly `1..=n`.
    pub fn empty_timetable(&self) -> Result<Timetable> {
        let classes: Vec<_> = self.classes().collect();
        let timetable = Timetable::from_classes(classes.into_iter())?;
        info!(
            problem = %self.name,
            classes = timetable.class_count(),
            "created empty timetable"
        );
        Ok(timetable)
    }

    pub fn hard_constraints(&self) -> impl Iterator<Item = &HardConstraint> + '_ {
        self.requirements.iter().filter_map(|r| match r {
            Requirement::Hard(h) => Some(h),
            Requirement::Soft(_) => None,
        })
    }

    pub fn soft_constraints(&self) -> impl Iterator<Item = &SoftConstraint> + '_ {
        self.requirements.iter().filter_map(|r| match r {
            Requirement::Soft(s) => Some(s),
            Requirement::Hard(_) => None,
        })
    }

    /// Whether every hard constraint holds. Stops at the first failure.
    pub fn is_feasible(&self, timetable: &Timetable) -> Result<bool> {
        for hard in self.hard_constraints() {
            if !hard.is_satisfied(timetable, &self.travel)? {
                debug!(
                    rule = %hard.constraint().rule(),
                    "hard constraint violated"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Sum of the penalties of all soft constraints.
    pub fn distribution_penalty(&self, timetable: &Timetable) -> Result<u64> {
        let mut total = 0;
        for soft in self.soft_constraints() {
            total += soft.penalty_for(timetable, &self.travel)?;
        }
        debug!(total, "distribution penalty computed");
        Ok(total)
    }
}
