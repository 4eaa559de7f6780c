//! Course structure and students.
//!
//! A course offers one or more configurations; a configuration is a list of
//! subparts (lecture, seminar, lab, ...); a subpart is a list of alternative
//! classes. A student taking a course picks one configuration and exactly one
//! class from each of its subparts. That choice (sectioning) is made elsewhere;
//! these types only describe containment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Class, ClassId, ConfigId, CourseId, StudentId, SubpartId};
use crate::error::{Result, TimetableError};

fn check_id(entity: &'static str, id: u32) -> Result<()> {
    if id == 0 {
        return Err(TimetableError::construction(entity, "id must be at least 1"));
    }
    Ok(())
}

/// A group of alternative classes of which a student attends one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSubpart")]
pub struct Subpart {
    id: SubpartId,
    classes: Vec<Arc<Class>>,
}

impl Subpart {
    /// Creates an empty subpart.
    pub fn new(id: SubpartId) -> Result<Self> {
        check_id("subpart", id)?;
        Ok(Self {
            id,
            classes: Vec::new(),
        })
    }

    /// Adds a class.
    pub fn with_class(mut self, class: Class) -> Self {
        self.classes.push(Arc::new(class));
        self
    }

    #[inline]
    pub fn id(&self) -> SubpartId {
        self.id
    }

    pub fn classes(&self) -> &[Arc<Class>] {
        &self.classes
    }
}

/// One way of taking a course: an ordered list of subparts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCourseConfig")]
pub struct CourseConfig {
    id: ConfigId,
    subparts: Vec<Subpart>,
}

impl CourseConfig {
    /// Creates an empty configuration.
    pub fn new(id: ConfigId) -> Result<Self> {
        check_id("config", id)?;
        Ok(Self {
            id,
            subparts: Vec::new(),
        })
    }

    /// Adds a subpart.
    pub fn with_subpart(mut self, subpart: Subpart) -> Self {
        self.subparts.push(subpart);
        self
    }

    #[inline]
    pub fn id(&self) -> ConfigId {
        self.id
    }

    pub fn subparts(&self) -> &[Subpart] {
        &self.subparts
    }
}

/// A course and its alternative configurations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCourse")]
pub struct Course {
    id: CourseId,
    configs: Vec<CourseConfig>,
}

impl Course {
    /// Creates a course without configurations.
    pub fn new(id: CourseId) -> Result<Self> {
        check_id("course", id)?;
        Ok(Self {
            id,
            configs: Vec::new(),
        })
    }

    /// Adds a configuration.
    pub fn with_config(mut self, config: CourseConfig) -> Self {
        self.configs.push(config);
        self
    }

    #[inline]
    pub fn id(&self) -> CourseId {
        self.id
    }

    pub fn configs(&self) -> &[CourseConfig] {
        &self.configs
    }

    /// Every class of every subpart of every configuration, in order.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<Class>> + '_ {
        self.configs
            .iter()
            .flat_map(|c| c.subparts.iter())
            .flat_map(|s| s.classes.iter())
    }

    /// Whether the course offers a class with this id.
    pub fn contains_class(&self, class_id: ClassId) -> bool {
        self.classes().any(|c| c.id() == class_id)
    }
}

/// A student and the courses they want to take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStudent")]
pub struct Student {
    id: StudentId,
    courses: Vec<CourseId>,
}

impl Student {
    /// Creates a student with no course demands.
    pub fn new(id: StudentId) -> Result<Self> {
        check_id("student", id)?;
        Ok(Self {
            id,
            courses: Vec::new(),
        })
    }

    /// Adds a course demand.
    pub fn with_course(mut self, course: CourseId) -> Self {
        self.courses.push(course);
        self
    }

    #[inline]
    pub fn id(&self) -> StudentId {
        self.id
    }

    /// Courses the student wants, in the order given.
    pub fn courses(&self) -> &[CourseId] {
        &self.courses
    }
}

/// Wire forms of the course types; ids are checked on the way in.
macro_rules! checked_wire_form {
    ($raw:ident => $ty:ident { $field:ident: $field_ty:ty }, $entity:literal) => {
        #[derive(Deserialize)]
        struct $raw {
            id: u32,
            $field: $field_ty,
        }

        impl TryFrom<$raw> for $ty {
            type Error = TimetableError;

            fn try_from(raw: $raw) -> Result<Self> {
                check_id($entity, raw.id)?;
                Ok(Self {
                    id: raw.id,
                    $field: raw.$field,
                })
            }
        }
    };
}

checked_wire_form!(RawSubpart => Subpart { classes: Vec<Arc<Class>> }, "subpart");
checked_wire_form!(RawCourseConfig => CourseConfig { subparts: Vec<Subpart> }, "config");
checked_wire_form!(RawCourse => Course { configs: Vec<CourseConfig> }, "course");
checked_wire_form!(RawStudent => Student { courses: Vec<CourseId> }, "student");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Time, TimeAssignment};

    fn class(id: ClassId) -> Class {
        let time = Time::parse("1", "1000000", 0, 12).unwrap();
        Class::new(id, 20, vec![TimeAssignment::new(time, 0)]).unwrap()
    }

    #[test]
    fn test_ids_must_be_positive() {
        assert!(Subpart::new(0).is_err());
        assert!(CourseConfig::new(0).is_err());
        assert!(Course::new(0).is_err());
        assert!(Student::new(0).is_err());
    }

    #[test]
    fn test_course_containment() {
        let course = Course::new(1)
            .unwrap()
            .with_config(
                CourseConfig::new(1)
                    .unwrap()
                    .with_subpart(Subpart::new(1).unwrap().with_class(class(1)).with_class(class(2)))
                    .with_subpart(Subpart::new(2).unwrap().with_class(class(3).with_parent(1))),
            )
            .with_config(
                CourseConfig::new(2)
                    .unwrap()
                    .with_subpart(Subpart::new(3).unwrap().with_class(class(4))),
            );

        let ids: Vec<ClassId> = course.classes().map(|c| c.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(course.contains_class(3));
        assert!(!course.contains_class(5));
        assert_eq!(course.configs()[0].subparts().len(), 2);
    }

    #[test]
    fn test_student_courses() {
        let s = Student::new(9).unwrap().with_course(2).with_course(1);
        assert_eq!(s.id(), 9);
        assert_eq!(s.courses(), &[2, 1]);
    }

    #[test]
    fn test_deserialize_checks_ids() {
        let course = Course::new(1).unwrap().with_config(
            CourseConfig::new(1)
                .unwrap()
                .with_subpart(Subpart::new(1).unwrap().with_class(class(1))),
        );
        let json = serde_json::to_string(&course).unwrap();
        assert_eq!(serde_json::from_str::<Course>(&json).unwrap(), course);

        assert!(serde_json::from_str::<Student>(r#"{"id":0,"courses":[1]}"#).is_err());
        assert!(serde_json::from_str::<Subpart>(r#"{"id":0,"classes":[]}"#).is_err());
        assert!(serde_json::from_str::<CourseConfig>(r#"{"id":0,"subparts":[]}"#).is_err());
        assert!(serde_json::from_str::<Course>(r#"{"id":0,"configs":[]}"#).is_err());
        // A bad class deep inside the tree fails the whole course.
        let nested = r#"{"id":1,"configs":[{"id":1,"subparts":[{"id":1,"classes":[
            {"id":5,"limit":1,"rooms":null,"times":[],"parent":null}]}]}]}"#;
        assert!(serde_json::from_str::<Course>(nested).is_err());
    }
}
