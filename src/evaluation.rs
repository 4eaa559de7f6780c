//! Timetable quality evaluation.
//!
//! Folds every feasibility check and penalty component of a candidate
//! timetable into one summary.
//!
//! # Components
//!
//! | Component | Definition | Kind |
//! |-----------|-----------|------|
//! | Unscheduled | Classes without an event, or whose event is not scheduled | hard |
//! | Hard violations | Σ violation counts of hard distribution constraints | hard |
//! | Room conflicts | Pairs of events in the same room that meet | hard |
//! | Room unavailability | Events placed in a room while it is unavailable | hard |
//! | Time / room penalty | Σ penalties of the chosen assignments | soft |
//! | Distribution penalty | Σ `penalty × violation_count` of soft constraints | soft |
//! | Student conflicts | Pairs of a student's events that meet or are out of travel reach | soft |
//!
//! A distribution constraint is evaluated only once all its classes are
//! scheduled; until then it is counted as pending.
//!
//! # Reference
//! Müller, Rudová, Müllerová (2018), "University course timetabling and
//! International Timetabling Competition 2019"

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::OptimizationWeights;
use crate::distribution::{attendees_compatible, DistributionConstraint};
use crate::error::Result;
use crate::models::{ClassId, Event, StudentId, Timetable};
use crate::problem::Problem;

/// Feasibility and penalty breakdown of a timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableEvaluation {
    /// Classes that are missing or not yet scheduled, in id order.
    pub unscheduled: Vec<ClassId>,
    /// Distribution constraints skipped because a class is not scheduled.
    pub pending_constraints: usize,
    /// Σ violation counts of hard distribution constraints.
    pub hard_violations: u64,
    /// Pairs of events sharing a room at the same time.
    pub room_conflicts: u64,
    /// Events placed in a room during one of its unavailable periods.
    pub room_unavailable: u64,
    /// Σ penalties of the time assignments.
    pub time_penalty: u64,
    /// Σ penalties of the room assignments.
    pub room_penalty: u64,
    /// Σ penalties of the soft distribution constraints.
    pub distribution_penalty: u64,
    /// Pairs of events attended by the same student that clash.
    pub student_conflicts: u64,
}

fn is_ready(constraint: &DistributionConstraint, timetable: &Timetable) -> bool {
    constraint
        .classes()
        .iter()
        .all(|&id| timetable.event(id).is_ok_and(Event::is_scheduled))
}

impl TimetableEvaluation {
    /// Evaluates `timetable` against every requirement of `problem`.
    ///
    /// # Errors
    /// `LengthMismatch` on inconsistent time data, `NotInitialized` /
    /// `IndexOutOfRange` if the travel matrix does not cover an assigned room.
    pub fn calculate(problem: &Problem, timetable: &Timetable) -> Result<Self> {
        let travel = problem.travel();

        let mut unscheduled = timetable.missing_events();
        unscheduled.extend(timetable.unscheduled_events().iter().map(|e| e.class_id()));
        unscheduled.sort_unstable();

        let mut pending_constraints = 0;
        let mut hard_violations = 0;
        for hard in problem.hard_constraints() {
            if is_ready(hard.constraint(), timetable) {
                hard_violations += hard.constraint().violation_count(timetable, travel)?;
            } else {
                pending_constraints += 1;
            }
        }

        let mut distribution_penalty = 0;
        for soft in problem.soft_constraints() {
            if is_ready(soft.constraint(), timetable) {
                distribution_penalty += soft.penalty_for(timetable, travel)?;
            } else {
                pending_constraints += 1;
            }
        }

        let scheduled: Vec<&Event> = timetable.events().filter(|e| e.is_scheduled()).collect();

        let mut room_conflicts = 0;
        let mut room_unavailable = 0;
        for (i, &first) in scheduled.iter().enumerate() {
            let Some(room) = first.room_assignment().map(|ra| ra.room()) else {
                continue;
            };
            let time = first.time()?;
            if !room.is_available_for(time)? {
                room_unavailable += 1;
            }
            for &second in &scheduled[i + 1..] {
                if second.room_id()? == Some(room.id()) && time.meets_with(second.time()?)? {
                    room_conflicts += 1;
                }
            }
        }

        let mut attended: BTreeMap<StudentId, Vec<&Event>> = BTreeMap::new();
        for &event in &scheduled {
            for &student in event.students() {
                attended.entry(student).or_default().push(event);
            }
        }
        let mut student_conflicts = 0;
        for events in attended.values() {
            for (i, &first) in events.iter().enumerate() {
                for &second in &events[i + 1..] {
                    if !attendees_compatible(first, second, travel)? {
                        student_conflicts += 1;
                    }
                }
            }
        }

        let evaluation = Self {
            unscheduled,
            pending_constraints,
            hard_violations,
            room_conflicts,
            room_unavailable,
            time_penalty: timetable.time_penalty(),
            room_penalty: timetable.room_penalty(),
            distribution_penalty,
            student_conflicts,
        };
        debug!(
            problem = problem.name(),
            feasible = evaluation.is_feasible(),
            soft_score = evaluation.soft_score(),
            "timetable evaluated"
        );
        Ok(evaluation)
    }

    /// Whether every class is scheduled and no hard requirement is broken.
    pub fn is_feasible(&self) -> bool {
        self.unscheduled.is_empty()
            && self.hard_violations == 0
            && self.room_conflicts == 0
            && self.room_unavailable == 0
    }

    /// Σ soft distribution penalties + Σ assignment penalties.
    pub fn soft_score(&self) -> u64 {
        self.distribution_penalty + self.time_penalty + self.room_penalty
    }

    /// The ITC weighted objective.
    pub fn weighted_total(&self, weights: &OptimizationWeights) -> u64 {
        weights.time * self.time_penalty
            + weights.room * self.room_penalty
            + weights.distribution * self.distribution_penalty
            + weights.student * self.student_conflicts
    }

    /// Whether the timetable is feasible and its soft score is within `max_score`.
    pub fn meets_threshold(&self, max_score: u64) -> bool {
        self.is_feasible() && self.soft_score() <= max_score
    }
}
