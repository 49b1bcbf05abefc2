//! Line coordinates of nodes
//!
//! A node remembers where it starts and ends in the diff text as well as in
//! the before and after versions of the file. Coordinates at a time the node
//! does not exist at are absent.

use crate::time::{DiffType, Time};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A line position in the diff and in both file versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LineNumber {
    /// Line in the unified diff
    pub in_diff: Option<u32>,
    /// Line in the file before the edit
    pub before: Option<u32>,
    /// Line in the file after the edit
    pub after: Option<u32>,
}

impl LineNumber {
    /// Position without any known coordinate
    pub const INVALID: Self = Self {
        in_diff: None,
        before: None,
        after: None,
    };

    /// Create a line number from its three coordinates
    #[inline]
    #[must_use]
    pub fn new(in_diff: u32, before: u32, after: u32) -> Self {
        Self {
            in_diff: Some(in_diff),
            before: Some(before),
            after: Some(after),
        }
    }

    /// Coordinate in the file version at `time`
    #[inline]
    #[must_use]
    pub fn at_time(&self, time: Time) -> Option<u32> {
        match time {
            Time::Before => self.before,
            Time::After => self.after,
        }
    }

    /// Drop the coordinate for any time a node of `diff_type` is absent at
    #[must_use]
    pub fn restricted_to(self, diff_type: DiffType) -> Self {
        Self {
            in_diff: self.in_diff,
            before: self.before.filter(|_| diff_type.exists_at_time(Time::Before)),
            after: self.after.filter(|_| diff_type.exists_at_time(Time::After)),
        }
    }
}

/// Half-open range between two positions in the diff text
#[inline]
#[must_use]
pub fn range_in_diff(from: &LineNumber, to: &LineNumber) -> Option<Range<u32>> {
    Some(from.in_diff?..to.in_diff?)
}

/// Half-open range between two positions in the file at `time`
#[inline]
#[must_use]
pub fn range_at_time(from: &LineNumber, to: &LineNumber, time: Time) -> Option<Range<u32>> {
    Some(from.at_time(time)?..to.at_time(time)?)
}
