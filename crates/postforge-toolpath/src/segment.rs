//! Toolpath segment types.

use postforge_math::{distance, up, Vec3};
use serde::{Deserialize, Serialize};

/// What a segment does. The set is closed; an unknown tag in an input
/// document is a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Outer or inner wall.
    Perimeter,
    /// Interior fill.
    Infill,
    /// Support structure.
    Support,
    /// Non-depositing repositioning move.
    Travel,
    /// Subtractive (cutting) pass.
    Machining,
}

impl SegmentKind {
    /// Lowercase tag, as used in input documents and `{segmentType}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Perimeter => "perimeter",
            SegmentKind::Infill => "infill",
            SegmentKind::Support => "support",
            SegmentKind::Travel => "travel",
            SegmentKind::Machining => "machining",
        }
    }

    /// Is this a travel (process off) segment?
    pub fn is_travel(&self) -> bool {
        matches!(self, SegmentKind::Travel)
    }

    /// All kinds.
    pub fn all() -> [SegmentKind; 5] {
        [
            SegmentKind::Perimeter,
            SegmentKind::Infill,
            SegmentKind::Support,
            SegmentKind::Travel,
            SegmentKind::Machining,
        ]
    }
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous run of points sharing kind, layer and speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolpathSegment {
    /// Segment kind.
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    /// Layer index.
    pub layer: u32,
    /// Points in motion order (mm).
    pub points: Vec<[f64; 3]>,
    /// Nominal speed (mm/s).
    pub speed: f64,
    /// Deposition/extrusion rate, zero for non-depositing segments.
    #[serde(default)]
    pub deposition_rate: f64,
    /// Build-plane normal, `+Z` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<[f64; 3]>,
}

impl ToolpathSegment {
    /// Create a segment with no explicit normal.
    pub fn new(kind: SegmentKind, layer: u32, points: Vec<[f64; 3]>, speed: f64) -> Self {
        Self {
            kind,
            layer,
            points,
            speed,
            deposition_rate: if kind.is_travel() { 0.0 } else { 1.0 },
            normal: None,
        }
    }

    /// Set the deposition rate.
    pub fn with_deposition_rate(mut self, rate: f64) -> Self {
        self.deposition_rate = rate;
        self
    }

    /// Set the build-plane normal.
    pub fn with_normal(mut self, normal: [f64; 3]) -> Self {
        self.normal = Some(normal);
        self
    }

    /// Check if the segment has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Build-plane normal, defaulting to the up axis.
    pub fn normal_or_up(&self) -> Vec3 {
        self.normal
            .map(|n| Vec3::new(n[0], n[1], n[2]))
            .unwrap_or_else(up)
    }

    /// Path length through the segment's own points.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| distance(w[0], w[1])).sum()
    }

    /// Starting point.
    pub fn start(&self) -> Option<&[f64; 3]> {
        self.points.first()
    }

    /// Ending point.
    pub fn end(&self) -> Option<&[f64; 3]> {
        self.points.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment_length() {
        let seg = ToolpathSegment::new(
            SegmentKind::Perimeter,
            0,
            vec![[10.0, 20.0, 0.0], [30.0, 20.0, 0.0], [30.0, 40.0, 0.0]],
            1000.0,
        );
        assert_relative_eq!(seg.length(), 40.0);
        assert_eq!(seg.len(), 3);
        assert_eq!(seg.start(), Some(&[10.0, 20.0, 0.0]));
    }

    #[test]
    fn test_normal_defaults_up() {
        let seg = ToolpathSegment::new(SegmentKind::Infill, 2, vec![], 50.0);
        assert_eq!(seg.normal_or_up(), Vec3::z());
        let tilted = seg.with_normal([1.0, 0.0, 0.0]);
        assert_eq!(tilted.normal_or_up(), Vec3::x());
    }

    #[test]
    fn test_kind_tags() {
        let json = serde_json::to_string(&SegmentKind::Machining).unwrap();
        assert_eq!(json, "\"machining\"");
        for kind in SegmentKind::all() {
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert!(SegmentKind::Travel.is_travel());
        assert!(!SegmentKind::Support.is_travel());
    }

    #[test]
    fn test_travel_has_no_deposition() {
        let seg = ToolpathSegment::new(SegmentKind::Travel, 0, vec![[0.0; 3]], 150.0);
        assert_eq!(seg.deposition_rate, 0.0);
    }
}
