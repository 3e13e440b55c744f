// ============================================================================
// freezefix-core/src/ranges.rs
// ============================================================================
//
// FRAME RANGES: Repair Range Type and Interval Merging
//
// A repair range is an inclusive `[start, end]` pair of 0-based frame
// indices. Both detectors collect candidate ranges in arrival order and
// canonicalize them here before returning.
//
// INVARIANT:
// After `merge_ranges`, the list is sorted ascending by start and any two
// consecutive ranges are separated by at least one frame that belongs to
// neither (overlapping and exactly adjacent ranges are fused).

use serde::Serialize;
use std::fmt;

/// Inclusive range of frame indices selected for interpolation.
///
/// Serializes as a two-element array `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "[u64; 2]")]
pub struct FrameRange {
    start: u64,
    end: u64,
}

impl FrameRange {
    /// Creates a range, or `None` when `start > end`.
    pub fn new(start: u64, end: u64) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates a range from raw numeric bounds as reported by callers that
    /// work in floating point. Non-finite, negative, fractional or reversed
    /// bounds yield `None`.
    pub fn from_bounds(start: f64, end: f64) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() {
            return None;
        }
        if start < 0.0 || start > end || start.fract() != 0.0 || end.fract() != 0.0 {
            return None;
        }
        Self::new(start as u64, end as u64)
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of frames covered by the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A valid range always covers at least one frame.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl From<FrameRange> for [u64; 2] {
    fn from(range: FrameRange) -> Self {
        [range.start, range.end]
    }
}

impl fmt::Display for FrameRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Canonicalizes ranges into a sorted list with no overlapping or adjacent
/// entries.
///
/// The result does not depend on input order, and merging an already merged
/// list returns it unchanged.
///
/// # Examples
///
/// ```rust
/// use freezefix_core::ranges::{FrameRange, merge_ranges};
///
/// let merged = merge_ranges(vec![
///     FrameRange::new(10, 12).unwrap(),
///     FrameRange::new(1, 3).unwrap(),
///     FrameRange::new(4, 6).unwrap(),
/// ]);
/// assert_eq!(merged, vec![FrameRange::new(1, 6).unwrap(), FrameRange::new(10, 12).unwrap()]);
/// ```
pub fn merge_ranges(mut ranges: Vec<FrameRange>) -> Vec<FrameRange> {
    ranges.sort_unstable();

    let mut merged: Vec<FrameRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end.saturating_add(1) => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Merges raw `(start, end)` pairs, silently dropping any pair that is not a
/// valid frame range (see [`FrameRange::from_bounds`]).
pub fn merge_bounds<I>(pairs: I) -> Vec<FrameRange>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let ranges = pairs
        .into_iter()
        .filter_map(|(start, end)| {
            let range = FrameRange::from_bounds(start, end);
            if range.is_none() {
                log::trace!("Dropping invalid frame range ({}, {})", start, end);
            }
            range
        })
        .collect();
    merge_ranges(ranges)
}
