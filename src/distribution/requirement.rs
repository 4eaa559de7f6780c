//! Hard and soft wrapping of distribution constraints.

use serde::{de, Deserialize, Deserializer, Serialize};

use super::{DistributionConstraint, DistributionKind, DistributionRule, Violation};
use crate::error::{Result, TimetableError};
use crate::models::{ClassId, Timetable, TravelTime};

/// A constraint every feasible timetable must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardConstraint<R = DistributionKind> {
    constraint: DistributionConstraint<R>,
}

impl<R: DistributionRule> HardConstraint<R> {
    pub fn new(constraint: DistributionConstraint<R>) -> Self {
        Self { constraint }
    }

    pub fn constraint(&self) -> &DistributionConstraint<R> {
        &self.constraint
    }

    pub fn is_satisfied(&self, timetable: &Timetable, travel: &TravelTime) -> Result<bool> {
        self.constraint.is_satisfied(timetable, travel)
    }

    pub fn violations<'a>(
        &'a self,
        timetable: &'a Timetable,
        travel: &TravelTime,
    ) -> Result<Vec<Violation<'a, R>>> {
        self.constraint.violations(timetable, travel)
    }
}

/// A constraint charged `penalty` per violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftConstraint<R = DistributionKind> {
    constraint: DistributionConstraint<R>,
    penalty: u32,
}

impl<R: DistributionRule> SoftConstraint<R> {
    /// Wraps a constraint with a per-violation penalty.
    ///
    /// # Errors
    /// `Construction` if `penalty` is 0.
    pub fn new(constraint: DistributionConstraint<R>, penalty: u32) -> Result<Self> {
        if penalty == 0 {
            return Err(TimetableError::construction(
                "soft constraint",
                format!("{} penalty must be at least 1", constraint.rule().name()),
            ));
        }
        Ok(Self {
            constraint,
            penalty,
        })
    }

    pub fn constraint(&self) -> &DistributionConstraint<R> {
        &self.constraint
    }

    /// Penalty per violation.
    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    /// `penalty × violation_count`.
    pub fn calc_penalty(&self, violation_count: u64) -> u64 {
        u64::from(self.penalty) * violation_count
    }

    /// Penalty this constraint contributes to the timetable.
    pub fn penalty_for(&self, timetable: &Timetable, travel: &TravelTime) -> Result<u64> {
        Ok(self.calc_penalty(self.constraint.violation_count(timetable, travel)?))
    }
}

#[derive(Deserialize)]
struct RawSoftConstraint<R> {
    constraint: DistributionConstraint<R>,
    penalty: u32,
}

impl<'de, R: Deserialize<'de>> Deserialize<'de> for SoftConstraint<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawSoftConstraint::<R>::deserialize(deserializer)?;
        if raw.penalty == 0 {
            return Err(de::Error::custom(TimetableError::construction(
                "soft constraint",
                "penalty must be at least 1",
            )));
        }
        Ok(Self {
            constraint: raw.constraint,
            penalty: raw.penalty,
        })
    }
}

/// A distribution constraint as listed in an instance: hard, or soft with a penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement<R = DistributionKind> {
    Hard(HardConstraint<R>),
    Soft(SoftConstraint<R>),
}

impl<R: DistributionRule> Requirement<R> {
    /// A hard requirement of `rule` over `classes`.
    pub fn hard(rule: R, classes: Vec<ClassId>) -> Self {
        Self::Hard(HardConstraint::new(DistributionConstraint::new(rule, classes)))
    }

    /// A soft requirement of `rule` over `classes`.
    ///
    /// # Errors
    /// `Construction` if `penalty` is 0.
    pub fn soft(rule: R, classes: Vec<ClassId>, penalty: u32) -> Result<Self> {
        SoftConstraint::new(DistributionConstraint::new(rule, classes), penalty).map(Self::Soft)
    }

    pub fn constraint(&self) -> &DistributionConstraint<R> {
        match self {
            Self::Hard(h) => h.constraint(),
            Self::Soft(s) => s.constraint(),
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Self::Hard(_))
    }

    /// Penalty per violation; `None` for hard requirements.
    pub fn penalty(&self) -> Option<u32> {
        match self {
            Self::Hard(_) => None,
            Self::Soft(s) => Some(s.penalty()),
        }
    }
}
