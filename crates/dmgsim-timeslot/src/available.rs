//! Free-time bookkeeping for allocatable timeslots.

use crate::error::TimeslotError;
use crate::Nanos;

/// Sorted, disjoint `(start, end)` ranges of unoccupied time.
///
/// Ranges only ever shrink or split; allocations are never released because a
/// timeslot tree is built once per run and dropped as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AvailableTime {
    ranges: Vec<(Nanos, Nanos)>,
}

impl AvailableTime {
    /// Track a single free range `[start, end]`.
    pub fn new(start: Nanos, end: Nanos) -> Self {
        Self {
            ranges: vec![(start, end)],
        }
    }

    /// Currently free ranges, in ascending order.
    pub fn ranges(&self) -> &[(Nanos, Nanos)] {
        &self.ranges
    }

    /// Whether no free time remains.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total free time.
    pub fn total(&self) -> Nanos {
        self.ranges.iter().map(|(start, end)| end - start).sum()
    }

    /// Occupy `[start, end]`.
    ///
    /// The span must lie within one free range. Matching the whole range
    /// removes it, matching one edge shrinks it, anything else splits it.
    pub fn allocate(&mut self, start: Nanos, end: Nanos) -> Result<(), TimeslotError> {
        if end < start {
            return Err(TimeslotError::InsufficientTime { start, end });
        }

        let idx = self.find_range(start, end)?;
        let (free_start, free_end) = self.ranges[idx];

        match (start == free_start, end == free_end) {
            (true, true) => {
                self.ranges.remove(idx);
            }
            (true, false) => self.ranges[idx] = (end, free_end),
            (false, true) => self.ranges[idx] = (free_start, start),
            (false, false) => {
                self.ranges[idx] = (free_start, start);
                self.ranges.insert(idx + 1, (end, free_end));
            }
        }
        Ok(())
    }

    /// Index of the free range containing `[start, end]`.
    fn find_range(&self, start: Nanos, end: Nanos) -> Result<usize, TimeslotError> {
        for (idx, &(free_start, free_end)) in self.ranges.iter().enumerate() {
            let start_inside = free_start <= start && start <= free_end;
            let end_inside = free_start <= end && end <= free_end;
            match (start_inside, end_inside) {
                (true, true) => return Ok(idx),
                (true, false) | (false, true) => {
                    return Err(TimeslotError::OverlappingAllocation { start, end })
                }
                (false, false) => continue,
            }
        }
        Err(TimeslotError::InsufficientTime { start, end })
    }
}
