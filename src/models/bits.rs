//! Fixed-width bit-vectors for days of the week and weeks of the term.
//!
//! Every distribution rule that reasons about *when* two classes meet does so
//! through a handful of operations on these vectors: intersection tests,
//! mutual-subset tests, first-set lookups and population counts. All binary
//! operations require equal widths and fail with
//! [`TimetableError::LengthMismatch`] otherwise, never truncating silently.
//!
//! # Representation
//! Bits are packed into `u64` words, least significant bit first, so bit `i`
//! is the `i`-th character of the ITC string form (`"0101"` has bits 1 and 3
//! set). Bits beyond the width are always zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Result, TimetableError};

const WORD_BITS: usize = 64;

type Words = SmallVec<[u64; 1]>;

/// A fixed-width bit-vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bits {
    width: usize,
    words: Words,
}

fn word_count(width: usize) -> usize {
    width.div_ceil(WORD_BITS)
}

impl Bits {
    /// Creates an all-zero vector of the given width.
    pub fn zeros(width: usize) -> Self {
        Self {
            width,
            words: SmallVec::from_elem(0, word_count(width)),
        }
    }

    /// Creates a vector from a slice of flags.
    pub fn from_bools(flags: &[bool]) -> Self {
        let mut bits = Self::zeros(flags.len());
        for (i, &flag) in flags.iter().enumerate() {
            if flag {
                bits.words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
            }
        }
        bits
    }

    /// Number of positions in this vector.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether bit `index` is set. Out-of-range indices read as unset.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        index < self.width && self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Sets or clears bit `index`.
    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        if index >= self.width {
            return Err(TimetableError::IndexOutOfRange {
                id: u32::try_from(index).unwrap_or(u32::MAX),
                size: self.width,
            });
        }
        let mask = 1 << (index % WORD_BITS);
        if value {
            self.words[index / WORD_BITS] |= mask;
        } else {
            self.words[index / WORD_BITS] &= !mask;
        }
        Ok(())
    }

    /// Builder: returns a copy with bit `index` set.
    pub fn with(mut self, index: usize) -> Result<Self> {
        self.set(index, true)?;
        Ok(self)
    }

    /// Number of set bits.
    #[inline]
    pub fn popcount(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Whether no bit is set.
    #[inline]
    pub fn none(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Index of the lowest set bit.
    ///
    /// Fails with [`TimetableError::NoMeetingDefined`] when no bit is set.
    pub fn first_set_index(&self) -> Result<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * WORD_BITS + w.trailing_zeros() as usize)
            .ok_or(TimetableError::NoMeetingDefined)
    }

    /// Iterates over the indices of set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width).filter(move |&i| self.get(i))
    }

    fn check_width(&self, other: &Self) -> Result<()> {
        if self.width != other.width {
            return Err(TimetableError::LengthMismatch {
                left: self.width,
                right: other.width,
            });
        }
        Ok(())
    }

    fn zip_with(&self, other: &Self, op: impl Fn(u64, u64) -> u64) -> Result<Self> {
        self.check_width(other)?;
        Ok(Self {
            width: self.width,
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(&a, &b)| op(a, b))
                .collect(),
        })
    }

    /// Bitwise AND.
    pub fn and(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a & b)
    }

    /// Bitwise OR.
    pub fn or(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a | b)
    }

    /// Whether the two vectors are disjoint (`a AND b` is all zero).
    pub fn and_is_empty(&self, other: &Self) -> Result<bool> {
        self.check_width(other)?;
        Ok(self
            .words
            .iter()
            .zip(&other.words)
            .all(|(&a, &b)| a & b == 0))
    }

    /// Whether the two vectors share at least one set bit.
    pub fn intersects(&self, other: &Self) -> Result<bool> {
        Ok(!self.and_is_empty(other)?)
    }

    /// Whether every bit set here is also set in `other`.
    pub fn is_subset_of(&self, other: &Self) -> Result<bool> {
        self.check_width(other)?;
        Ok(self
            .words
            .iter()
            .zip(&other.words)
            .all(|(&a, &b)| a & !b == 0))
    }

    /// Whether `a OR b` equals `a` or equals `b`, i.e. one vector contains
    /// the other.
    pub fn is_subset_or_superset(&self, other: &Self) -> Result<bool> {
        Ok(self.is_subset_of(other)? || other.is_subset_of(self)?)
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.width {
            f.write_str(if self.get(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Bits {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        let mut bits = Self::zeros(s.len());
        for (i, c) in s.chars().enumerate() {
            match c {
                '0' => {}
                '1' => bits.words[i / WORD_BITS] |= 1 << (i % WORD_BITS),
                _ => {
                    return Err(TimetableError::InvalidBitString {
                        input: s.to_string(),
                    })
                }
            }
        }
        Ok(bits)
    }
}

impl TryFrom<String> for Bits {
    type Error = TimetableError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Bits> for String {
    fn from(bits: Bits) -> Self {
        bits.to_string()
    }
}
