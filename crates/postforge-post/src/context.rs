//! Per-point values handed to backends and hook templates.

use postforge_math::EulerZyx;
use postforge_toolpath::{SegmentKind, ToolpathSegment};

/// Everything known about one point at the moment it is emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PointContext {
    /// Position (mm).
    pub position: [f64; 3],
    /// Tool orientation derived from the segment normal.
    pub orientation: EulerZyx,
    /// Nominal speed (mm/s).
    pub speed: f64,
    /// Deposition rate of the segment.
    pub deposition_rate: f64,
    /// Segment kind.
    pub kind: SegmentKind,
    /// Layer index.
    pub layer: u32,
    /// Index of the point within its segment.
    pub point_index: usize,
    /// Elapsed-time estimate when the point is reached (s).
    pub elapsed: f64,
    /// First point of its segment.
    pub first_in_segment: bool,
    /// Last point of its segment.
    pub last_in_segment: bool,
}

impl PointContext {
    /// Context for point `index` of `segment`.
    ///
    /// Panics if `index` is out of range; callers only build contexts for
    /// points they are iterating.
    pub fn for_point(
        segment: &ToolpathSegment,
        index: usize,
        orientation: EulerZyx,
        elapsed: f64,
    ) -> Self {
        Self {
            position: segment.points[index],
            orientation,
            speed: segment.speed,
            deposition_rate: segment.deposition_rate,
            kind: segment.kind,
            layer: segment.layer,
            point_index: index,
            elapsed,
            first_in_segment: index == 0,
            last_in_segment: index + 1 == segment.points.len(),
        }
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.position[0]
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.position[1]
    }

    /// Z coordinate.
    pub fn z(&self) -> f64 {
        self.position[2]
    }
}

impl Default for PointContext {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            orientation: EulerZyx::TOOL_DOWN,
            speed: 0.0,
            deposition_rate: 0.0,
            kind: SegmentKind::Travel,
            layer: 0,
            point_index: 0,
            elapsed: 0.0,
            first_in_segment: true,
            last_in_segment: true,
        }
    }
}
