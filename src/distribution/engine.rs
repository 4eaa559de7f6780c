//! Shared evaluator for distribution constraints.
//!
//! Satisfaction, violation counting and violation listing all run through one
//! routine. [`EvaluationMode::FirstViolation`] stops at the first failing unit;
//! [`EvaluationMode::Exhaustive`] visits every unit, so the count it yields is
//! complete even when the constraint is already known to fail.
//!
//! # Units
//! | Arity | Unit | Amount |
//! |-------|------|--------|
//! | Pairwise | pair `(i, j)`, `i < j` | 1 |
//! | Single | class | deficiency |
//! | Aggregate | list or (week, day) | excess |

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Arity, DistributionKind, DistributionRule};
use crate::error::{Result, TimetableError};
use crate::models::{ClassId, Event, Timetable, TravelTime};

/// How far an evaluation goes once a violation is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// Stop at the first failing unit.
    FirstViolation,
    /// Visit every unit.
    #[default]
    Exhaustive,
}

/// A rule applied to an ordered list of classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConstraint<R = DistributionKind> {
    rule: R,
    classes: Vec<ClassId>,
}

/// A failing unit of a constraint.
///
/// References the implicated events of the evaluated timetable; records are
/// produced only by evaluation.
#[derive(Debug, Clone)]
pub struct Violation<'a, R = DistributionKind> {
    /// The violated constraint.
    pub constraint: &'a DistributionConstraint<R>,
    /// First implicated event (the culprit for single and aggregate rules).
    pub first: &'a Event,
    /// Second event of a failing pair.
    pub second: Option<&'a Event>,
    /// Contribution to the violation count.
    pub amount: u64,
}

/// Result of one evaluation.
#[derive(Debug, Clone)]
pub struct Outcome<'a, R = DistributionKind> {
    /// Sum of the amounts of all visited failing units.
    pub count: u64,
    /// One record per visited failing unit.
    pub violations: Vec<Violation<'a, R>>,
}

impl<R> Outcome<'_, R> {
    /// Whether no failing unit was found.
    pub fn is_satisfied(&self) -> bool {
        self.count == 0
    }
}

impl<R: DistributionRule> DistributionConstraint<R> {
    /// Creates a constraint over `classes`, in list order.
    pub fn new(rule: R, classes: Vec<ClassId>) -> Self {
        Self { rule, classes }
    }

    /// The rule being enforced.
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Constrained classes, in list order.
    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    /// Whether the timetable satisfies the constraint. Stops at the first failure.
    ///
    /// # Errors
    /// `MissingEvent` if a listed class has no event, `Unassigned` if a rule
    /// needs a time or room that is not assigned, `LengthMismatch` if two
    /// events disagree on days/weeks widths.
    pub fn is_satisfied(&self, timetable: &Timetable, travel: &TravelTime) -> Result<bool> {
        let events = self.events(timetable)?;
        Ok(self.run(&events, travel, EvaluationMode::FirstViolation, |_| {})? == 0)
    }

    /// Total number of failing pairs, classes or units. Never short-circuits.
    pub fn violation_count(&self, timetable: &Timetable, travel: &TravelTime) -> Result<u64> {
        let events = self.events(timetable)?;
        self.run(&events, travel, EvaluationMode::Exhaustive, |_| {})
    }

    /// One record per failing unit.
    pub fn violations<'a>(
        &'a self,
        timetable: &'a Timetable,
        travel: &TravelTime,
    ) -> Result<Vec<Violation<'a, R>>> {
        Ok(self.evaluate(timetable, travel, EvaluationMode::Exhaustive)?.violations)
    }

    /// Evaluates in the given mode, keeping every visited violation.
    pub fn evaluate<'a>(
        &'a self,
        timetable: &'a Timetable,
        travel: &TravelTime,
        mode: EvaluationMode,
    ) -> Result<Outcome<'a, R>> {
        let events = self.events(timetable)?;
        let mut violations = Vec::new();
        let count = self.run(&events, travel, mode, |v| violations.push(v))?;
        Ok(Outcome { count, violations })
    }

    fn events<'a>(&self, timetable: &'a Timetable) -> Result<Vec<&'a Event>> {
        self.classes.iter().map(|&id| timetable.event(id)).collect()
    }

    /// Visits failing units in a fixed order and returns the sum of their amounts.
    fn run<'a>(
        &'a self,
        events: &[&'a Event],
        travel: &TravelTime,
        mode: EvaluationMode,
        mut sink: impl FnMut(Violation<'a, R>),
    ) -> Result<u64> {
        let stop = mode == EvaluationMode::FirstViolation;
        let mut count = 0u64;
        let mut record = |first: &'a Event, second: Option<&'a Event>, amount: u64| {
            count += amount;
            sink(Violation {
                constraint: self,
                first,
                second,
                amount,
            });
        };

        match self.rule.arity() {
            Arity::Pairwise => {
                'pairs: for (i, &first) in events.iter().enumerate() {
                    for &second in &events[i + 1..] {
                        if !self.rule.check_pair(first, second, travel)? {
                            record(first, Some(second), 1);
                            if stop {
                                break 'pairs;
                            }
                        }
                    }
                }
            }
            Arity::Single => {
                for &event in events {
                    let deficiency = self.rule.deficiency(event)?;
                    if deficiency > 0 {
                        record(event, None, deficiency);
                        if stop {
                            break;
                        }
                    }
                }
            }
            Arity::Aggregate => {
                for unit in self.rule.aggregate(events, stop)? {
                    let &culprit = events.get(unit.culprit).ok_or_else(|| {
                        TimetableError::IndexOutOfRange {
                            id: u32::try_from(unit.culprit).unwrap_or(u32::MAX),
                            size: events.len(),
                        }
                    })?;
                    record(culprit, None, unit.amount);
                    if stop {
                        break;
                    }
                }
            }
        }

        if count > 0 {
            debug!(
                rule = self.rule.name(),
                classes = self.classes.len(),
                count,
                ?mode,
                "distribution constraint violated"
            );
        }
        Ok(count)
    }
}
