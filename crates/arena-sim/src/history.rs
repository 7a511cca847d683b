//! Rolling trajectory history.

use serde::{Deserialize, Serialize};

use arena_core::constants::HISTORY_LEN;
use arena_core::types::TrajectorySegment;

/// The last `HISTORY_LEN` segments flown, newest first. Always full.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentHistory {
    segments: [TrajectorySegment; HISTORY_LEN],
}

impl SegmentHistory {
    /// A history holding `HISTORY_LEN` copies of `seed`.
    pub fn filled(seed: TrajectorySegment) -> Self {
        Self {
            segments: [seed; HISTORY_LEN],
        }
    }

    /// Insert `segment` as the newest entry, dropping the oldest.
    pub fn push_front(&mut self, segment: TrajectorySegment) {
        self.segments.rotate_right(1);
        self.segments[0] = segment;
    }

    pub fn latest(&self) -> &TrajectorySegment {
        &self.segments[0]
    }

    pub fn as_slice(&self) -> &[TrajectorySegment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrajectorySegment> {
        self.segments.iter()
    }
}
