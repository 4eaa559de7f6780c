//! Times and time assignments.
//!
//! A day is split into 288 five-minute slots, from midnight to midnight. A
//! [`Time`] is a meeting pattern: a start slot and a length, repeated on the
//! days of `days` in each week of `weeks`. Five-minute granularity lets travel
//! times and irregular meeting times be expressed exactly.
//!
//! # Interval Model
//! Within a day a time covers the half-open slot range `[start, end)`.

use serde::{Deserialize, Serialize};

use super::Bits;
use crate::error::{Result, TimetableError};

/// Number of five-minute slots in a day.
pub const SLOTS_PER_DAY: u16 = 288;

/// Maximum width of a days-of-week vector.
pub const MAX_DAYS: usize = 7;

/// A meeting pattern of a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTime")]
pub struct Time {
    weeks: Bits,
    days: Bits,
    start: u16,
    length: u16,
}

impl Time {
    /// Creates a time.
    ///
    /// # Errors
    /// `Construction` when `days` is wider than 7, `start` exceeds 288, or
    /// `start + length` exceeds 288.
    pub fn new(weeks: Bits, days: Bits, start: u16, length: u16) -> Result<Self> {
        if days.width() > MAX_DAYS {
            return Err(TimetableError::construction(
                "time",
                format!("days vector has {} positions, at most {MAX_DAYS} allowed", days.width()),
            ));
        }
        if start > SLOTS_PER_DAY {
            return Err(TimetableError::construction(
                "time",
                format!("start slot {start} is outside 0..={SLOTS_PER_DAY}"),
            ));
        }
        if u32::from(start) + u32::from(length) > u32::from(SLOTS_PER_DAY) {
            return Err(TimetableError::construction(
                "time",
                format!("start {start} + length {length} passes {SLOTS_PER_DAY} slots"),
            ));
        }
        Ok(Self {
            weeks,
            days,
            start,
            length,
        })
    }

    /// Parses the ITC string forms of weeks and days.
    pub fn parse(weeks: &str, days: &str, start: u16, length: u16) -> Result<Self> {
        Self::new(weeks.parse()?, days.parse()?, start, length)
    }

    /// Weeks of the term in which this time takes place.
    #[inline]
    pub fn weeks(&self) -> &Bits {
        &self.weeks
    }

    /// Days of the week on which this time takes place.
    #[inline]
    pub fn days(&self) -> &Bits {
        &self.days
    }

    /// First slot.
    #[inline]
    pub fn start(&self) -> u16 {
        self.start
    }

    /// Duration in slots.
    #[inline]
    pub fn length(&self) -> u16 {
        self.length
    }

    /// Slot right after the last one covered: `start + length`.
    #[inline]
    pub fn end(&self) -> u16 {
        self.start + self.length
    }

    /// Whether the two slot ranges overlap within a day, ignoring days and weeks.
    #[inline]
    pub fn overlaps_in_day(&self, other: &Self) -> bool {
        other.start < self.end() && self.start < other.end()
    }

    /// Whether one slot range contains the other.
    pub fn nests_with(&self, other: &Self) -> bool {
        (self.start <= other.start && other.end() <= self.end())
            || (other.start <= self.start && self.end() <= other.end())
    }

    /// Whether the two times share a day of the week.
    pub fn shares_days(&self, other: &Self) -> Result<bool> {
        self.days.intersects(&other.days)
    }

    /// Whether the two times share a week of the term.
    pub fn shares_weeks(&self, other: &Self) -> Result<bool> {
        self.weeks.intersects(&other.weeks)
    }

    /// Whether the two times are ever in session at the same moment.
    pub fn meets_with(&self, other: &Self) -> Result<bool> {
        Ok(self.overlaps_in_day(other) && self.shares_days(other)? && self.shares_weeks(other)?)
    }

    /// Whether this time takes place on day `day` of week `week`.
    #[inline]
    pub fn is_active_on(&self, week: usize, day: usize) -> bool {
        self.weeks.get(week) && self.days.get(day)
    }
}

/// Wire form of [`Time`], checked through [`Time::new`] on the way in.
#[derive(Deserialize)]
struct RawTime {
    weeks: Bits,
    days: Bits,
    start: u16,
    length: u16,
}

impl TryFrom<RawTime> for Time {
    type Error = TimetableError;

    fn try_from(raw: RawTime) -> Result<Self> {
        Self::new(raw.weeks, raw.days, raw.start, raw.length)
    }
}

/// A legal time for a class, with the penalty of choosing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeAssignment {
    time: Time,
    penalty: u32,
}

impl TimeAssignment {
    /// Creates a time assignment.
    pub fn new(time: Time, penalty: u32) -> Self {
        Self { time, penalty }
    }

    /// The assigned time.
    #[inline]
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Penalty of choosing this time.
    #[inline]
    pub fn penalty(&self) -> u32 {
        self.penalty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(days: &str, start: u16, length: u16) -> Time {
        Time::parse("11", days, start, length).unwrap()
    }

    #[test]
    fn test_time_bounds() {
        let t = time("1010100", 90, 22);
        assert_eq!(t.start(), 90);
        assert_eq!(t.length(), 22);
        assert_eq!(t.end(), 112);

        assert!(Time::parse("1", "1", 288, 0).is_ok());
        assert!(Time::parse("1", "1", 0, 288).is_ok());
        assert!(Time::parse("1", "1", 289, 0).is_err());
        assert!(Time::parse("1", "1", 280, 9).is_err());
    }

    #[test]
    fn test_too_many_days() {
        let err = Time::parse("1", "10000001", 0, 10).unwrap_err();
        assert!(matches!(err, TimetableError::Construction { entity: "time", .. }));
    }

    #[test]
    fn test_overlap_in_day() {
        let a = time("1000000", 0, 10);
        let b = time("1000000", 5, 10);
        let c = time("1000000", 10, 10);
        assert!(a.overlaps_in_day(&b));
        assert!(b.overlaps_in_day(&a));
        // Touching intervals do not overlap.
        assert!(!a.overlaps_in_day(&c));
    }

    #[test]
    fn test_nesting() {
        let outer = time("1000000", 0, 30);
        let inner = time("0100000", 10, 5);
        assert!(outer.nests_with(&inner));
        assert!(inner.nests_with(&outer));
        assert!(!inner.nests_with(&time("1000000", 12, 10)));
    }

    #[test]
    fn test_meets_with() {
        let a = Time::parse("10", "1000000", 0, 10).unwrap();
        let b = Time::parse("11", "1000000", 5, 10).unwrap();
        let other_week = Time::parse("01", "1000000", 5, 10).unwrap();
        let other_day = Time::parse("10", "0100000", 5, 10).unwrap();
        assert!(a.meets_with(&b).unwrap());
        assert!(!a.meets_with(&other_week).unwrap());
        assert!(!a.meets_with(&other_day).unwrap());
        assert!(a.is_active_on(0, 0));
        assert!(!a.is_active_on(1, 0));
    }

    #[test]
    fn test_meets_with_length_mismatch() {
        let a = Time::parse("10", "10000", 0, 10).unwrap();
        let b = Time::parse("10", "1000000", 0, 10).unwrap();
        assert!(matches!(
            a.meets_with(&b),
            Err(TimetableError::LengthMismatch { left: 5, right: 7 })
        ));
    }

    #[test]
    fn test_time_assignment() {
        let ta = TimeAssignment::new(time("1000000", 0, 12), 4);
        assert_eq!(ta.penalty(), 4);
        assert_eq!(ta.time().end(), 12);
    }

    #[test]
    fn test_deserialize_checks_bounds() {
        let ok: Time =
            serde_json::from_str(r#"{"weeks":"1","days":"1000000","start":90,"length":22}"#).unwrap();
        assert_eq!(ok, Time::parse("1", "1000000", 90, 22).unwrap());

        // Would overflow `end()` if accepted.
        assert!(serde_json::from_str::<Time>(r#"{"weeks":"1","days":"1","start":65535,"length":1}"#).is_err());
        assert!(serde_json::from_str::<Time>(r#"{"weeks":"1","days":"1","start":280,"length":9}"#).is_err());
        assert!(serde_json::from_str::<Time>(
            r#"{"weeks":"1","days":"10000000000","start":0,"length":1}"#
        )
        .is_err());
        assert!(serde_json::from_str::<TimeAssignment>(
            r#"{"time":{"weeks":"1","days":"1","start":289,"length":0},"penalty":0}"#
        )
        .is_err());
    }
}
