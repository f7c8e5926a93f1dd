#![warn(missing_docs)]

//! Vendor-neutral toolpath model.
//!
//! A toolpath is produced upstream (slicing, infill, CAM) and consumed
//! read-only by the program generator. This crate only defines the data
//! model, JSON loading and summary statistics; it never reorders or
//! rewrites motion.
//!
//! # Example
//!
//! ```
//! use postforge_toolpath::{SegmentKind, Toolpath, ToolpathSegment};
//!
//! let toolpath = Toolpath::new(vec![ToolpathSegment::new(
//!     SegmentKind::Perimeter,
//!     0,
//!     vec![[10.0, 20.0, 0.0], [30.0, 20.0, 0.0]],
//!     40.0,
//! )]);
//!
//! let summary = toolpath.summary();
//! assert_eq!(summary.total_points, 2);
//! ```

pub mod error;
pub mod segment;

pub use error::{Result, ToolpathError};
pub use segment::{SegmentKind, ToolpathSegment};

use std::collections::BTreeSet;
use std::path::Path;

use postforge_math::distance;
use serde::{Deserialize, Serialize};

/// An ordered motion plan for a single part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Toolpath {
    /// Segments in execution order.
    pub segments: Vec<ToolpathSegment>,
    /// Total layer count reported by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_layers: Option<usize>,
    /// Nominal layer height (mm).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_height: Option<f64>,
    /// Point count reported by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_points: Option<usize>,
    /// Segment count reported by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_segments: Option<usize>,
    /// Tool-center-point standoff along tool Z (mm), if the producer knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_offset_z: Option<f64>,
}

/// Summary figures used for program header text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolpathSummary {
    /// Number of layers.
    pub total_layers: usize,
    /// Nominal layer height (mm), zero if unknown.
    pub layer_height: f64,
    /// Number of points.
    pub total_points: usize,
    /// Number of segments.
    pub total_segments: usize,
    /// Tool-center-point standoff, if supplied.
    pub tool_offset_z: Option<f64>,
}

impl Toolpath {
    /// Create a toolpath from segments with no producer summary.
    pub fn new(segments: Vec<ToolpathSegment>) -> Self {
        Self {
            segments,
            ..Default::default()
        }
    }

    /// Parse a toolpath document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and parse a toolpath file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check if there are no segments at all.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments that carry at least one point.
    pub fn non_empty_segments(&self) -> impl Iterator<Item = &ToolpathSegment> {
        self.segments.iter().filter(|s| !s.is_empty())
    }

    /// Total number of points over all segments.
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    /// Distinct layer indices in order of first appearance.
    pub fn layer_order(&self) -> Vec<u32> {
        let mut seen = BTreeSet::new();
        let mut order = Vec::new();
        for seg in self.non_empty_segments() {
            if seen.insert(seg.layer) {
                order.push(seg.layer);
            }
        }
        order
    }

    /// Total path length across all points, including the jumps between segments.
    pub fn path_length(&self) -> f64 {
        let mut length = 0.0;
        let mut prev: Option<[f64; 3]> = None;
        for seg in self.non_empty_segments() {
            for p in &seg.points {
                if let Some(q) = prev {
                    length += distance(q, *p);
                }
                prev = Some(*p);
            }
        }
        length
    }

    /// Summary for header text, preferring producer-reported figures.
    pub fn summary(&self) -> ToolpathSummary {
        ToolpathSummary {
            total_layers: self
                .total_layers
                .unwrap_or_else(|| self.layer_order().len()),
            layer_height: self.layer_height.unwrap_or(0.0),
            total_points: self.total_points.unwrap_or_else(|| self.point_count()),
            total_segments: self.total_segments.unwrap_or(self.segments.len()),
            tool_offset_z: self.tool_offset_z,
        }
    }
}
