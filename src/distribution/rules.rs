//! Built-in distribution rules (the ITC 2019 catalog).
//!
//! # Categories
//!
//! - **Time of day**: SameStart, SameTime, DifferentTime
//! - **Days / weeks**: SameDays, DifferentDays, SameWeeks, DifferentWeeks
//! - **Rooms**: SameRoom, DifferentRoom
//! - **Meetings**: Overlap, NotOverlap, SameAttendees, Precedence, WorkDay(S), MinGap(G)
//! - **Load (aggregate)**: MaxDays(D), MaxDayLoad(S), MaxBreaks(R,S), MaxBlock(M,S)
//!
//! In the predicates below `Ci` is listed before `Cj`; `end = start + length`.
//!
//! # Rooms
//! A class that needs no room has no room to share or to travel from: room
//! equality rules hold for any pair involving it, and its travel time is 0.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{AggregateUnit, Arity, DistributionRule};
use crate::error::{Result, TimetableError};
use crate::models::{Bits, Event, Time, TravelTime};

/// A built-in distribution rule with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionKind {
    /// `Ci.start = Cj.start`.
    SameStart,
    /// One slot range contains the other.
    SameTime,
    /// `(Ci.end ≤ Cj.start) ∨ (Cj.end ≤ Ci.start)`.
    DifferentTime,
    /// One days vector contains the other.
    SameDays,
    /// `(Ci.days and Cj.days) = 0`.
    DifferentDays,
    /// One weeks vector contains the other.
    SameWeeks,
    /// `(Ci.weeks and Cj.weeks) = 0`.
    DifferentWeeks,
    /// `Ci.room = Cj.room`.
    SameRoom,
    /// `Ci.room ≠ Cj.room`.
    DifferentRoom,
    /// Slot ranges overlap and a day and a week are shared.
    Overlap,
    /// Negation of `Overlap`.
    NotOverlap,
    /// Attendees can get from one class to the other in time.
    ///
    /// `(Ci.end + travel ≤ Cj.start) ∨ (Cj.end + travel ≤ Ci.start)`, or no
    /// shared day, or no shared week.
    SameAttendees,
    /// `Ci` comes first: by first week, then first day, then `Ci.end ≤ Cj.start`.
    ///
    /// Only the first meeting of each class is compared.
    Precedence,
    /// Classes sharing a day and week fit in a span of `max_slots`.
    WorkDay { max_slots: u16 },
    /// Classes sharing a day and week are at least `min_gap` slots apart.
    MinGap { min_gap: u16 },
    /// The classes together use at most `max_days` distinct days of the week.
    MaxDays { max_days: u32 },
    /// On every day of every week the classes last at most `max_slots` in total.
    MaxDayLoad { max_slots: u32 },
    /// At most `max_breaks` gaps longer than `min_gap` slots per day.
    MaxBreaks { max_breaks: u32, min_gap: u16 },
    /// Blocks of classes closer than `max_gap` slots span at most `max_length`.
    MaxBlock { max_length: u16, max_gap: u16 },
}

fn ensure_same_shape(a: &Time, b: &Time) -> Result<()> {
    for (x, y) in [(a.days(), b.days()), (a.weeks(), b.weeks())] {
        if x.width() != y.width() {
            return Err(TimetableError::LengthMismatch {
                left: x.width(),
                right: y.width(),
            });
        }
    }
    Ok(())
}

/// Whether the two times never share a day or never share a week.
fn apart(a: &Time, b: &Time) -> Result<bool> {
    Ok(!a.shares_days(b)? || !a.shares_weeks(b)?)
}

fn separated_by(a: &Time, b: &Time, gap: u32) -> bool {
    u32::from(a.end()) + gap <= u32::from(b.start())
        || u32::from(b.end()) + gap <= u32::from(a.start())
}

/// Rooms of both events, if both have one.
fn room_pair(first: &Event, second: &Event) -> Result<Option<(u32, u32)>> {
    Ok(first.room_id()?.zip(second.room_id()?))
}

/// Whether students attending both events can make it from one to the other.
pub(crate) fn attendees_compatible(first: &Event, second: &Event, travel: &TravelTime) -> Result<bool> {
    let (a, b) = (first.time()?, second.time()?);
    ensure_same_shape(a, b)?;
    let travel_slots = match room_pair(first, second)? {
        Some((ra, rb)) if ra != rb => u32::from(travel.get(ra, rb)?),
        _ => 0,
    };
    Ok(separated_by(a, b, travel_slots) || apart(a, b)?)
}

fn precedes(a: &Time, b: &Time) -> Result<bool> {
    let (wa, wb) = (a.weeks().first_set_index()?, b.weeks().first_set_index()?);
    let (da, db) = (a.days().first_set_index()?, b.days().first_set_index()?);
    Ok(wa < wb || (wa == wb && (da < db || (da == db && a.end() <= b.start()))))
}

/// Common weeks/days widths of all events.
fn term_shape(times: &[&Time]) -> Result<(usize, usize)> {
    let Some(first) = times.first() else {
        return Ok((0, 0));
    };
    for t in &times[1..] {
        ensure_same_shape(first, t)?;
    }
    Ok((first.weeks().width(), first.days().width()))
}

/// A run of classes on one day with no break between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    start: u32,
    end: u32,
    members: usize,
}

/// Groups the classes active on one day into blocks.
///
/// Classes are taken in start order; a class joins the current block when
/// `joins(gap)` holds for the gap between the block's latest end and its start.
fn day_blocks(mut active: Vec<&Time>, joins: impl Fn(i64) -> bool) -> Vec<Block> {
    active.sort_by_key(|t| (t.start(), t.end()));
    let mut blocks: Vec<Block> = Vec::new();
    for t in active {
        let (start, end) = (u32::from(t.start()), u32::from(t.end()));
        match blocks.last_mut() {
            Some(b) if joins(i64::from(start) - i64::from(b.end)) => {
                b.end = b.end.max(end);
                b.members += 1;
            }
            _ => blocks.push(Block {
                start,
                end,
                members: 1,
            }),
        }
    }
    blocks
}

impl DistributionKind {
    /// Per-(week, day) excess, visiting weeks in the outer loop.
    fn per_day(
        times: &[&Time],
        stop_on_first: bool,
        excess: impl Fn(Vec<&Time>) -> u64,
    ) -> Result<Vec<AggregateUnit>> {
        let (nr_weeks, nr_days) = term_shape(times)?;
        let mut units = Vec::new();
        for week in 0..nr_weeks {
            for day in 0..nr_days {
                let mut culprit = None;
                let mut active = Vec::new();
                for (i, t) in times.iter().enumerate() {
                    if t.is_active_on(week, day) {
                        culprit.get_or_insert(i);
                        active.push(*t);
                    }
                }
                let Some(culprit) = culprit else { continue };
                let amount = excess(active);
                if amount > 0 {
                    units.push(AggregateUnit { culprit, amount });
                    if stop_on_first {
                        return Ok(units);
                    }
                }
            }
        }
        Ok(units)
    }

    fn check_times(&self, a: &Time, b: &Time) -> Result<bool> {
        ensure_same_shape(a, b)?;
        Ok(match *self {
            Self::SameStart => a.start() == b.start(),
            Self::SameTime => a.nests_with(b),
            Self::DifferentTime => !a.overlaps_in_day(b),
            Self::SameDays => a.days().is_subset_or_superset(b.days())?,
            Self::DifferentDays => a.days().and_is_empty(b.days())?,
            Self::SameWeeks => a.weeks().is_subset_or_superset(b.weeks())?,
            Self::DifferentWeeks => a.weeks().and_is_empty(b.weeks())?,
            Self::Overlap => a.meets_with(b)?,
            Self::NotOverlap => !a.meets_with(b)?,
            Self::Precedence => precedes(a, b)?,
            Self::WorkDay { max_slots } => {
                apart(a, b)?
                    || a.end().max(b.end()) - a.start().min(b.start()) <= max_slots
            }
            Self::MinGap { min_gap } => apart(a, b)? || separated_by(a, b, u32::from(min_gap)),
            _ => true,
        })
    }
}

impl DistributionRule for DistributionKind {
    fn name(&self) -> &'static str {
        match self {
            Self::SameStart => "SameStart",
            Self::SameTime => "SameTime",
            Self::DifferentTime => "DifferentTime",
            Self::SameDays => "SameDays",
            Self::DifferentDays => "DifferentDays",
            Self::SameWeeks => "SameWeeks",
            Self::DifferentWeeks => "DifferentWeeks",
            Self::SameRoom => "SameRoom",
            Self::DifferentRoom => "DifferentRoom",
            Self::Overlap => "Overlap",
            Self::NotOverlap => "NotOverlap",
            Self::SameAttendees => "SameAttendees",
            Self::Precedence => "Precedence",
            Self::WorkDay { .. } => "WorkDay",
            Self::MinGap { .. } => "MinGap",
            Self::MaxDays { .. } => "MaxDays",
            Self::MaxDayLoad { .. } => "MaxDayLoad",
            Self::MaxBreaks { .. } => "MaxBreaks",
            Self::MaxBlock { .. } => "MaxBlock",
        }
    }

    fn arity(&self) -> Arity {
        match self {
            Self::MaxDays { .. }
            | Self::MaxDayLoad { .. }
            | Self::MaxBreaks { .. }
            | Self::MaxBlock { .. } => Arity::Aggregate,
            _ => Arity::Pairwise,
        }
    }

    fn check_pair(&self, first: &Event, second: &Event, travel: &TravelTime) -> Result<bool> {
        match self {
            Self::SameRoom => Ok(room_pair(first, second)?.is_none_or(|(a, b)| a == b)),
            Self::DifferentRoom => Ok(room_pair(first, second)?.is_none_or(|(a, b)| a != b)),
            Self::SameAttendees => attendees_compatible(first, second, travel),
            _ => self.check_times(first.time()?, second.time()?),
        }
    }

    fn aggregate(&self, events: &[&Event], stop_on_first: bool) -> Result<Vec<AggregateUnit>> {
        let times = events
            .iter()
            .map(|e| e.time())
            .collect::<Result<Vec<_>>>()?;

        match *self {
            Self::MaxDays { max_days } => {
                let Some((first, rest)) = times.split_first() else {
                    return Ok(Vec::new());
                };
                let mut used: Bits = first.days().clone();
                for t in rest {
                    used = used.or(t.days())?;
                }
                let used = u64::from(used.popcount());
                let max_days = u64::from(max_days);
                Ok(if used > max_days {
                    vec![AggregateUnit {
                        culprit: 0,
                        amount: used - max_days,
                    }]
                } else {
                    Vec::new()
                })
            }
            Self::MaxDayLoad { max_slots } => Self::per_day(&times, stop_on_first, |active| {
                let load: u64 = active.iter().map(|t| u64::from(t.length())).sum();
                load.saturating_sub(u64::from(max_slots))
            }),
            Self::MaxBreaks {
                max_breaks,
                min_gap,
            } => Self::per_day(&times, stop_on_first, |active| {
                let blocks = day_blocks(active, |gap| gap <= i64::from(min_gap)).len() as u64;
                blocks.saturating_sub(u64::from(max_breaks) + 1)
            }),
            Self::MaxBlock {
                max_length,
                max_gap,
            } => Self::per_day(&times, stop_on_first, |active| {
                day_blocks(active, |gap| gap < i64::from(max_gap))
                    .iter()
                    .filter(|b| b.members > 1 && b.end - b.start > u32::from(max_length))
                    .count() as u64
            }),
            _ => Ok(Vec::new()),
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match *self {
            Self::WorkDay { max_slots } => write!(f, "{name}({max_slots})"),
            Self::MinGap { min_gap } => write!(f, "{name}({min_gap})"),
            Self::MaxDays { max_days } => write!(f, "{name}({max_days})"),
            Self::MaxDayLoad { max_slots } => write!(f, "{name}({max_slots})"),
            Self::MaxBreaks {
                max_breaks,
                min_gap,
            } => write!(f, "{name}({max_breaks},{min_gap})"),
            Self::MaxBlock {
                max_length,
                max_gap,
            } => write!(f, "{name}({max_length},{max_gap})"),
            _ => f.write_str(name),
        }
    }
}

impl FromStr for DistributionKind {
    type Err = TimetableError;

    /// Parses ITC type tokens such as `SameRoom`, `WorkDay(6)`, `MaxBlock(72,6)`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| TimetableError::InvalidRuleSpec {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (name, args) = match s.split_once('(') {
            Some((name, rest)) => {
                let inner = rest
                    .strip_suffix(')')
                    .ok_or_else(|| invalid("missing closing parenthesis"))?;
                let args = inner
                    .split(',')
                    .map(|a| a.trim().parse::<u32>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|_| invalid("parameters must be non-negative integers"))?;
                (name.trim(), args)
            }
            None => (s.trim(), Vec::new()),
        };

        let slots = |v: u32| u16::try_from(v).map_err(|_| invalid("slot parameter out of range"));

        let kind = match (name, args.as_slice()) {
            ("SameStart", []) => Self::SameStart,
            ("SameTime", []) => Self::SameTime,
            ("DifferentTime", []) => Self::DifferentTime,
            ("SameDays", []) => Self::SameDays,
            ("DifferentDays", []) => Self::DifferentDays,
            ("SameWeeks", []) => Self::SameWeeks,
            ("DifferentWeeks", []) => Self::DifferentWeeks,
            ("SameRoom", []) => Self::SameRoom,
            ("DifferentRoom", []) => Self::DifferentRoom,
            ("Overlap", []) => Self::Overlap,
            ("NotOverlap", []) => Self::NotOverlap,
            ("SameAttendees", []) => Self::SameAttendees,
            ("Precedence", []) => Self::Precedence,
            ("WorkDay", &[n]) => Self::WorkDay {
                max_slots: slots(n)?,
            },
            ("MinGap", &[g]) => Self::MinGap { min_gap: slots(g)? },
            ("MaxDays", &[d]) => Self::MaxDays { max_days: d },
            ("MaxDayLoad", &[n]) => Self::MaxDayLoad { max_slots: n },
            ("MaxBreaks", &[r, g]) => Self::MaxBreaks {
                max_breaks: r,
                min_gap: slots(g)?,
            },
            ("MaxBlock", &[m, g]) => Self::MaxBlock {
                max_length: slots(m)?,
                max_gap: slots(g)?,
            },
            _ => return Err(invalid("unknown rule or wrong number of parameters")),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Class, Room, RoomAssignment, TimeAssignment};
    use std::sync::Arc;

    /// An event scheduled at the given time, optionally in a room.
    fn event(id: u32, weeks: &str, days: &str, start: u16, length: u16, room: Option<u32>) -> Event {
        let ta = TimeAssignment::new(Time::parse(weeks, days, start, length).unwrap(), 0);
        let mut class = Class::new(id, 10, vec![ta.clone()]).unwrap();
        let ra = room.map(|r| RoomAssignment::new(Arc::new(Room::new(r, 30).unwrap()), 0));
        if let Some(ra) = &ra {
            class = class.with_rooms(vec![ra.clone()]);
        }
        let mut e = Event::new(Arc::new(class));
        e.assign_time(ta).unwrap();
        if let Some(ra) = ra {
            e.assign_room(ra).unwrap();
        }
        e
    }

    fn on(days: &str, start: u16, length: u16) -> Event {
        event(1, "1", days, start, length, None)
    }

    fn pair(kind: DistributionKind, a: &Event, b: &Event) -> bool {
        kind.check_pair(a, b, &TravelTime::new()).unwrap()
    }

    #[test]
    fn test_time_of_day_rules() {
        let a = on("1000000", 0, 10);
        let b = on("0100000", 0, 6);
        let c = on("1000000", 10, 10);
        assert!(pair(DistributionKind::SameStart, &a, &b));
        assert!(!pair(DistributionKind::SameStart, &a, &c));
        assert!(pair(DistributionKind::SameTime, &a, &b));
        assert!(!pair(DistributionKind::SameTime, &a, &c));
        assert!(pair(DistributionKind::DifferentTime, &a, &c));
        assert!(!pair(DistributionKind::DifferentTime, &a, &b));
    }

    #[test]
    fn test_different_days_disjoint_and_shared_day() {
        let mon = event(1, "1", "100", 0, 10, None);
        let tue = event(2, "1", "010", 0, 10, None);
        let mon2 = event(3, "1", "100", 40, 10, None);
        assert!(pair(DistributionKind::DifferentDays, &mon, &tue));
        assert!(!pair(DistributionKind::DifferentDays, &mon, &mon2));
    }

    #[test]
    fn test_same_days_and_weeks() {
        let mwf = event(1, "1100", "1010100", 0, 10, None);
        let mon = event(2, "0100", "1000000", 0, 10, None);
        let tue = event(3, "1111", "0100000", 0, 10, None);
        assert!(pair(DistributionKind::SameDays, &mwf, &mon));
        assert!(!pair(DistributionKind::SameDays, &mwf, &tue));
        assert!(pair(DistributionKind::SameWeeks, &mwf, &mon));
        assert!(pair(DistributionKind::SameWeeks, &mwf, &tue));
        assert!(!pair(DistributionKind::DifferentWeeks, &mwf, &tue));
        assert!(pair(DistributionKind::DifferentWeeks, &event(4, "0011", "1000000", 0, 1, None), &mon));
    }

    #[test]
    fn test_overlap_and_not_overlap_are_negations() {
        let a = on("1000000", 0, 10);
        let b = on("1000000", 5, 10);
        assert!(pair(DistributionKind::Overlap, &a, &b));
        assert!(!pair(DistributionKind::NotOverlap, &a, &b));

        for other in [on("1000000", 10, 5), on("0100000", 5, 10)] {
            assert!(!pair(DistributionKind::Overlap, &a, &other));
            assert!(pair(DistributionKind::NotOverlap, &a, &other));
        }
    }

    #[test]
    fn test_room_rules() {
        let r5a = event(1, "1", "1", 0, 10, Some(5));
        let r5b = event(2, "1", "1", 20, 10, Some(5));
        let r6 = event(3, "1", "1", 0, 10, Some(6));
        let roomless = event(4, "1", "1", 0, 10, None);

        assert!(pair(DistributionKind::SameRoom, &r5a, &r5b));
        assert!(!pair(DistributionKind::SameRoom, &r5a, &r6));
        assert!(!pair(DistributionKind::DifferentRoom, &r5a, &r5b));
        assert!(pair(DistributionKind::DifferentRoom, &r5a, &r6));
        assert!(pair(DistributionKind::SameRoom, &r5a, &roomless));
        assert!(pair(DistributionKind::DifferentRoom, &r5a, &roomless));
    }

    #[test]
    fn test_same_attendees_uses_travel_time() {
        let travel = TravelTime::with_rooms(2).with_travel(1, 2, 3).unwrap();
        let a = event(1, "1", "1", 0, 10, Some(1));
        let near = event(2, "1", "1", 13, 10, Some(2));
        let tight = event(3, "1", "1", 12, 10, Some(2));
        let same_room = event(4, "1", "1", 10, 10, Some(1));

        let kind = DistributionKind::SameAttendees;
        assert!(kind.check_pair(&a, &near, &travel).unwrap());
        assert!(kind.check_pair(&near, &a, &travel).unwrap());
        assert!(!kind.check_pair(&a, &tight, &travel).unwrap());
        assert!(kind.check_pair(&a, &same_room, &travel).unwrap());

        // Different rooms need the matrix.
        assert_eq!(
            kind.check_pair(&a, &near, &TravelTime::new()),
            Err(TimetableError::NotInitialized)
        );
    }

    #[test]
    fn test_precedence_is_order_sensitive() {
        let early = event(1, "10", "0100000", 50, 10, None);
        let later_week = event(2, "01", "1000000", 0, 10, None);
        let same_day_after = event(3, "10", "0100000", 60, 10, None);
        let same_day_before = event(4, "10", "0100000", 0, 10, None);

        let p = DistributionKind::Precedence;
        assert!(pair(p, &early, &later_week));
        assert!(!pair(p, &later_week, &early));
        assert!(pair(p, &early, &same_day_after));
        assert!(!pair(p, &early, &same_day_before));
    }

    #[test]
    fn test_precedence_without_meeting() {
        let a = event(1, "00", "1000000", 0, 10, None);
        let b = event(2, "10", "1000000", 0, 10, None);
        assert_eq!(
            DistributionKind::Precedence.check_pair(&a, &b, &TravelTime::new()),
            Err(TimetableError::NoMeetingDefined)
        );
    }

    #[test]
    fn test_work_day_and_min_gap() {
        let a = on("1000000", 0, 10);
        let b = on("1000000", 30, 10);
        let elsewhere = on("0100000", 100, 10);

        assert!(pair(DistributionKind::WorkDay { max_slots: 40 }, &a, &b));
        assert!(!pair(DistributionKind::WorkDay { max_slots: 39 }, &a, &b));
        assert!(pair(DistributionKind::WorkDay { max_slots: 1 }, &a, &elsewhere));

        assert!(pair(DistributionKind::MinGap { min_gap: 20 }, &a, &b));
        assert!(pair(DistributionKind::MinGap { min_gap: 20 }, &b, &a));
        assert!(!pair(DistributionKind::MinGap { min_gap: 21 }, &b, &a));
        assert!(pair(DistributionKind::MinGap { min_gap: 200 }, &a, &elsewhere));
    }

    #[test]
    fn test_pairwise_length_mismatch() {
        let a = event(1, "1", "100", 0, 10, None);
        let b = event(2, "1", "1000000", 50, 10, None);
        // Fails even for rules that never look at days.
        assert_eq!(
            DistributionKind::SameStart.check_pair(&a, &b, &TravelTime::new()),
            Err(TimetableError::LengthMismatch { left: 3, right: 7 })
        );
    }

    #[test]
    fn test_max_days_three_distinct_days_over_two() {
        let a = on("1000000", 0, 10);
        let b = on("1000000", 20, 10);
        let c = on("0110000", 0, 10);
        let units = DistributionKind::MaxDays { max_days: 2 }
            .aggregate(&[&a, &b, &c], false)
            .unwrap();
        assert_eq!(units, vec![AggregateUnit { culprit: 0, amount: 1 }]);

        let units = DistributionKind::MaxDays { max_days: 3 }
            .aggregate(&[&a, &b, &c], false)
            .unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_max_day_load() {
        let a = event(1, "11", "1100000", 0, 50, None);
        let b = event(2, "10", "1000000", 100, 40, None);
        let c = event(3, "01", "0100000", 200, 20, None);
        let kind = DistributionKind::MaxDayLoad { max_slots: 60 };

        // week 0 Mon: 90 → 30 over; week 1 Tue: 70 → 10 over.
        let units = kind.aggregate(&[&a, &b, &c], false).unwrap();
        assert_eq!(
            units,
            vec![
                AggregateUnit { culprit: 0, amount: 30 },
                AggregateUnit { culprit: 0, amount: 10 },
            ]
        );
        assert_eq!(kind.aggregate(&[&a, &b, &c], true).unwrap().len(), 1);
    }

    #[test]
    fn test_aggregate_term_shape_mismatch() {
        let two_weeks = event(1, "11", "1000000", 0, 10, None);
        let one_week = event(2, "1", "1000000", 20, 10, None);
        assert_eq!(
            DistributionKind::MaxDayLoad { max_slots: 5 }.aggregate(&[&two_weeks, &one_week], false),
            Err(TimetableError::LengthMismatch { left: 2, right: 1 })
        );

        let five_days = event(3, "1", "10000", 0, 10, None);
        let seven_days = event(4, "1", "1000000", 0, 10, None);
        assert_eq!(
            DistributionKind::MaxDays { max_days: 1 }.aggregate(&[&seven_days, &five_days], false),
            Err(TimetableError::LengthMismatch { left: 7, right: 5 })
        );
    }

    #[test]
    fn test_max_breaks() {
        let a = on("1000000", 0, 12);
        let b = on("1000000", 14, 12); // gap 2
        let c = on("1000000", 40, 12); // gap 14
        let d = on("1000000", 80, 12); // gap 28

        let units = DistributionKind::MaxBreaks { max_breaks: 1, min_gap: 2 }
            .aggregate(&[&a, &b, &c, &d], false)
            .unwrap();
        // Blocks {a,b}, {c}, {d} → 2 breaks, one too many.
        assert_eq!(units, vec![AggregateUnit { culprit: 0, amount: 1 }]);

        let units = DistributionKind::MaxBreaks { max_breaks: 1, min_gap: 14 }
            .aggregate(&[&a, &b, &c, &d], false)
            .unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_max_block() {
        let a = on("1000000", 0, 12);
        let b = on("1000000", 14, 12);
        let c = on("1000000", 28, 12);
        let lone = on("1000000", 100, 60);

        // Gap 2 < 3 joins a, b, c into a 40-slot block.
        let kind = DistributionKind::MaxBlock { max_length: 36, max_gap: 3 };
        let units = kind.aggregate(&[&a, &b, &c, &lone], false).unwrap();
        assert_eq!(units, vec![AggregateUnit { culprit: 0, amount: 1 }]);

        // Gap 2 is not below 2: no multi-class block, and a lone long class is fine.
        let kind = DistributionKind::MaxBlock { max_length: 36, max_gap: 2 };
        assert!(kind.aggregate(&[&a, &b, &c, &lone], false).unwrap().is_empty());
    }

    #[test]
    fn test_aggregate_requires_time() {
        let class = Arc::new(
            Class::new(
                1,
                1,
                vec![TimeAssignment::new(Time::parse("1", "1", 0, 1).unwrap(), 0)],
            )
            .unwrap(),
        );
        let unassigned = Event::new(class);
        assert!(DistributionKind::MaxDays { max_days: 1 }
            .aggregate(&[&unassigned], false)
            .is_err());
    }

    #[test]
    fn test_parse_and_display() {
        for token in [
            "SameStart",
            "SameAttendees",
            "WorkDay(6)",
            "MinGap(12)",
            "MaxDays(2)",
            "MaxDayLoad(72)",
            "MaxBreaks(2,12)",
            "MaxBlock(72,6)",
        ] {
            let kind: DistributionKind = token.parse().unwrap();
            assert_eq!(kind.to_string(), token);
        }
        assert_eq!(
            "MaxBreaks( 1 , 3 )".parse::<DistributionKind>().unwrap(),
            DistributionKind::MaxBreaks { max_breaks: 1, min_gap: 3 }
        );
    }

    #[test]
    fn test_parse_errors() {
        for token in ["Nope", "WorkDay", "WorkDay(6", "SameRoom(1)", "MinGap(-1)", "MinGap(70000)"] {
            assert!(matches!(
                token.parse::<DistributionKind>(),
                Err(TimetableError::InvalidRuleSpec { .. })
            ));
        }
    }

    #[test]
    fn test_arity() {
        assert_eq!(DistributionKind::SameRoom.arity(), Arity::Pairwise);
        assert_eq!(DistributionKind::Precedence.arity(), Arity::Pairwise);
        assert_eq!(DistributionKind::MaxDays { max_days: 1 }.arity(), Arity::Aggregate);
        assert_eq!(
            DistributionKind::MaxBlock { max_length: 1, max_gap: 1 }.arity(),
            Arity::Aggregate
        );
    }
}
