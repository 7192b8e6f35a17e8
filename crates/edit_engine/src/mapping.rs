//! Position mapping through document changes
//!
//! Every step reports how it moved positions as a `StepMap`: a list of
//! replaced ranges `(start, old_size, new_size)` in the coordinates of the
//! document before the step. A `Mapping` chains the maps of a transaction.

use serde::{Deserialize, Serialize};

/// Which side a position sticks to when content is inserted at it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assoc {
    /// Stay before inserted content
    Before,
    /// Move after inserted content
    After,
}

/// One replaced range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRange {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

impl StepRange {
    fn end(&self) -> usize {
        self.start + self.old_size
    }
}

/// Result of mapping a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapResult {
    /// The mapped position
    pub pos: usize,
    /// The position was strictly inside a replaced range
    pub deleted: bool,
    /// Content directly after the position was replaced
    pub deleted_after: bool,
}

/// Position changes made by one step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMap {
    ranges: Vec<StepRange>,
}

impl StepMap {
    /// A map that moves nothing
    pub fn identity() -> Self {
        Self::default()
    }

    /// A map replacing `old_size` positions at `start` with `new_size` positions
    pub fn replace(start: usize, old_size: usize, new_size: usize) -> Self {
        if old_size == 0 && new_size == 0 {
            return Self::identity();
        }
        Self {
            ranges: vec![StepRange {
                start,
                old_size,
                new_size,
            }],
        }
    }

    pub fn ranges(&self) -> &[StepRange] {
        &self.ranges
    }

    pub fn is_identity(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Map a position
    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        self.map_result(pos, assoc).pos
    }

    /// Map a position, reporting deletions around it
    pub fn map_result(&self, pos: usize, assoc: Assoc) -> MapResult {
        let mut diff: isize = 0;
        for range in &self.ranges {
            if range.start > pos {
                break;
            }
            let end = range.end();
            if pos <= end {
                let stick_after = if range.old_size == 0 {
                    assoc == Assoc::After
                } else if pos == range.start {
                    false
                } else if pos == end {
                    true
                } else {
                    assoc == Assoc::After
                };
                let base = range.start as isize + diff;
                let mapped = if stick_after {
                    base + range.new_size as isize
                } else {
                    base
                };
                return MapResult {
                    pos: mapped.max(0) as usize,
                    deleted: pos > range.start && pos < end,
                    deleted_after: pos >= range.start && pos < end,
                };
            }
            diff += range.new_size as isize - range.old_size as isize;
        }
        MapResult {
            pos: (pos as isize + diff).max(0) as usize,
            deleted: false,
            deleted_after: false,
        }
    }
}

/// A chain of step maps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    maps: Vec<StepMap>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step map
    pub fn push(&mut self, map: StepMap) {
        self.maps.push(map);
    }

    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }

    /// Whether no step moved any position
    pub fn is_identity(&self) -> bool {
        self.maps.iter().all(StepMap::is_identity)
    }

    /// Map a position through every step
    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        self.map_result(pos, assoc).pos
    }

    /// Map a position through every step, accumulating deletion flags
    pub fn map_result(&self, pos: usize, assoc: Assoc) -> MapResult {
        let mut result = MapResult {
            pos,
            deleted: false,
            deleted_after: false,
        };
        for map in &self.maps {
            let step = map.map_result(result.pos, assoc);
            result = MapResult {
                pos: step.pos,
                deleted: result.deleted || step.deleted,
                deleted_after: result.deleted_after || step.deleted_after,
            };
        }
        result
    }
}
