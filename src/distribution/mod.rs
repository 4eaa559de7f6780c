//! Distribution constraints and their evaluation.
//!
//! A distribution constraint restricts the relative placement of a list of
//! classes. Every rule is classified by [`Arity`]:
//!
//! - **Pairwise**: a predicate over every unordered pair of the list (`i < j`,
//!   so order-sensitive rules such as `Precedence` see list order).
//! - **Single**: a non-negative deficiency per class, evaluated independently.
//! - **Aggregate**: a joint predicate over the whole list, split into units
//!   (the whole list, or one unit per week/day) that each carry an excess.
//!
//! A single evaluator ([`DistributionConstraint::evaluate`]) implements the
//! three modes once; rules only supply pure predicates through
//! [`DistributionRule`]. Whether a constraint is hard or soft is decided by
//! wrapping it in a [`Requirement`].
//!
//! # Usage
//!
//! ```
//! use u_timetable::distribution::{DistributionConstraint, DistributionKind};
//!
//! let kind: DistributionKind = "MaxBreaks(1,12)".parse().unwrap();
//! let constraint = DistributionConstraint::new(kind, vec![1, 2, 3]);
//! assert_eq!(constraint.classes(), &[1, 2, 3]);
//! assert_eq!(constraint.rule().to_string(), "MaxBreaks(1,12)");
//! ```

mod engine;
mod requirement;
mod rules;

pub use engine::{DistributionConstraint, EvaluationMode, Outcome, Violation};
pub use requirement::{HardConstraint, Requirement, SoftConstraint};
pub use rules::DistributionKind;

pub(crate) use rules::attendees_compatible;

use std::fmt::Debug;

use crate::error::Result;
use crate::models::{Event, TravelTime};

/// How a rule's predicate ranges over the constrained classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Predicate over every unordered pair.
    Pairwise,
    /// Deficiency of each class on its own.
    Single,
    /// Joint predicate over the whole list.
    Aggregate,
}

/// A failing unit reported by an aggregate rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateUnit {
    /// Index into the evaluated event list of the event the unit is charged to.
    pub culprit: usize,
    /// Size of the excess; always at least 1.
    pub amount: u64,
}

/// A distribution rule plugged into the shared evaluator.
///
/// Implementors override the hook matching their [`Arity`]; the other hooks
/// keep their neutral defaults and are never called.
pub trait DistributionRule: Debug + Send + Sync {
    /// Rule name (e.g., "SameRoom", "MaxDays").
    fn name(&self) -> &'static str;

    /// Which evaluation mode applies.
    fn arity(&self) -> Arity;

    /// Whether an ordered pair (`first` listed before `second`) satisfies the rule.
    fn check_pair(&self, _first: &Event, _second: &Event, _travel: &TravelTime) -> Result<bool> {
        Ok(true)
    }

    /// How far a single event falls short of the rule (0 = satisfied).
    fn deficiency(&self, _event: &Event) -> Result<u64> {
        Ok(0)
    }

    /// Failing units over the whole list, in a deterministic order.
    ///
    /// With `stop_on_first`, implementations may return after the first unit.
    fn aggregate(&self, _events: &[&Event], _stop_on_first: bool) -> Result<Vec<AggregateUnit>> {
        Ok(Vec::new())
    }
}
