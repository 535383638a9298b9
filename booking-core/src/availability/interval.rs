//! Half-open interval arithmetic over UTC instants

use chrono::{DateTime, Utc};

/// A half-open window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Interval { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Strict half-open overlap: touching endpoints do not overlap
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Merge overlapping or touching intervals into a sorted union
pub fn union(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.retain(|iv| !iv.is_empty());
    intervals.sort_by_key(|iv| iv.start);
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if iv.start <= last.end => {
                if iv.end > last.end {
                    last.end = iv.end;
                }
            }
            _ => merged.push(iv),
        }
    }
    merged
}

/// Remove `cut` from every block via three-way split: left remainder, right
/// remainder, or full removal when the cut covers the block
pub fn subtract(blocks: Vec<Interval>, cut: Interval) -> Vec<Interval> {
    if cut.is_empty() {
        return blocks;
    }
    let mut out = Vec::with_capacity(blocks.len() + 1);
    for block in blocks {
        if !block.overlaps(&cut) {
            out.push(block);
            continue;
        }
        if cut.start > block.start {
            out.push(Interval::new(block.start, cut.start));
        }
        if cut.end < block.end {
            out.push(Interval::new(cut.end, block.end));
        }
    }
    out
}
