//! User-configurable hook templates.

use serde::{Deserialize, Serialize};

/// A fixed injection point in the generated program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    /// After the backend header.
    ProgramStart,
    /// Before the backend footer.
    ProgramEnd,
    /// After the backend layer-change code.
    LayerStart,
    /// When leaving a layer.
    LayerEnd,
    /// After the backend process-on code.
    ProcessOn,
    /// After the backend process-off code.
    ProcessOff,
    /// Before each motion command.
    BeforePoint,
    /// After each motion command.
    AfterPoint,
    /// Once, right after `ProgramStart`.
    ToolChange,
    /// After each process-off.
    Retract,
    /// Before each process-on.
    Prime,
    /// Before the first point of a non-empty segment.
    SegmentStart,
    /// After the last point of a non-empty segment.
    SegmentEnd,
}

impl HookPoint {
    /// Every injection point.
    pub fn all() -> [HookPoint; 13] {
        [
            HookPoint::ProgramStart,
            HookPoint::ProgramEnd,
            HookPoint::LayerStart,
            HookPoint::LayerEnd,
            HookPoint::ProcessOn,
            HookPoint::ProcessOff,
            HookPoint::BeforePoint,
            HookPoint::AfterPoint,
            HookPoint::ToolChange,
            HookPoint::Retract,
            HookPoint::Prime,
            HookPoint::SegmentStart,
            HookPoint::SegmentEnd,
        ]
    }

    /// Configuration key.
    pub fn key(&self) -> &'static str {
        match self {
            HookPoint::ProgramStart => "program_start",
            HookPoint::ProgramEnd => "program_end",
            HookPoint::LayerStart => "layer_start",
            HookPoint::LayerEnd => "layer_end",
            HookPoint::ProcessOn => "process_on",
            HookPoint::ProcessOff => "process_off",
            HookPoint::BeforePoint => "before_point",
            HookPoint::AfterPoint => "after_point",
            HookPoint::ToolChange => "tool_change",
            HookPoint::Retract => "retract",
            HookPoint::Prime => "prime",
            HookPoint::SegmentStart => "segment_start",
            HookPoint::SegmentEnd => "segment_end",
        }
    }

    /// Look up a point by configuration key.
    pub fn from_key(key: &str) -> Option<Self> {
        HookPoint::all().into_iter().find(|p| p.key() == key)
    }
}

/// One template per injection point. Blank templates are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookSet {
    /// See [`HookPoint::ProgramStart`].
    pub program_start: String,
    /// See [`HookPoint::ProgramEnd`].
    pub program_end: String,
    /// See [`HookPoint::LayerStart`].
    pub layer_start: String,
    /// See [`HookPoint::LayerEnd`].
    pub layer_end: String,
    /// See [`HookPoint::ProcessOn`].
    pub process_on: String,
    /// See [`HookPoint::ProcessOff`].
    pub process_off: String,
    /// See [`HookPoint::BeforePoint`].
    pub before_point: String,
    /// See [`HookPoint::AfterPoint`].
    pub after_point: String,
    /// See [`HookPoint::ToolChange`].
    pub tool_change: String,
    /// See [`HookPoint::Retract`].
    pub retract: String,
    /// See [`HookPoint::Prime`].
    pub prime: String,
    /// See [`HookPoint::SegmentStart`].
    pub segment_start: String,
    /// See [`HookPoint::SegmentEnd`].
    pub segment_end: String,
}

impl HookSet {
    /// Template for an injection point.
    pub fn get(&self, point: HookPoint) -> &str {
        match point {
            HookPoint::ProgramStart => &self.program_start,
            HookPoint::ProgramEnd => &self.program_end,
            HookPoint::LayerStart => &self.layer_start,
            HookPoint::LayerEnd => &self.layer_end,
            HookPoint::ProcessOn => &self.process_on,
            HookPoint::ProcessOff => &self.process_off,
            HookPoint::BeforePoint => &self.before_point,
            HookPoint::AfterPoint => &self.after_point,
            HookPoint::ToolChange => &self.tool_change,
            HookPoint::Retract => &self.retract,
            HookPoint::Prime => &self.prime,
            HookPoint::SegmentStart => &self.segment_start,
            HookPoint::SegmentEnd => &self.segment_end,
        }
    }

    fn slot_mut(&mut self, point: HookPoint) -> &mut String {
        match point {
            HookPoint::ProgramStart => &mut self.program_start,
            HookPoint::ProgramEnd => &mut self.program_end,
            HookPoint::LayerStart => &mut self.layer_start,
            HookPoint::LayerEnd => &mut self.layer_end,
            HookPoint::ProcessOn => &mut self.process_on,
            HookPoint::ProcessOff => &mut self.process_off,
            HookPoint::BeforePoint => &mut self.before_point,
            HookPoint::AfterPoint => &mut self.after_point,
            HookPoint::ToolChange => &mut self.tool_change,
            HookPoint::Retract => &mut self.retract,
            HookPoint::Prime => &mut self.prime,
            HookPoint::SegmentStart => &mut self.segment_start,
            HookPoint::SegmentEnd => &mut self.segment_end,
        }
    }

    /// Set the template for an injection point.
    pub fn set(&mut self, point: HookPoint, template: impl Into<String>) {
        *self.slot_mut(point) = template.into();
    }

    /// Builder-style [`HookSet::set`].
    pub fn with(mut self, point: HookPoint, template: impl Into<String>) -> Self {
        self.set(point, template);
        self
    }

    /// Is the template for `point` absent or whitespace?
    pub fn is_blank(&self, point: HookPoint) -> bool {
        self.get(point).trim().is_empty()
    }

    /// Are all templates blank?
    pub fn is_empty(&self) -> bool {
        HookPoint::all().into_iter().all(|p| self.is_blank(p))
    }

    /// Overlay every non-blank template of `other` onto `self`.
    pub fn merge(&mut self, other: &HookSet) {
        for point in HookPoint::all() {
            if !other.is_blank(point) {
                self.set(point, other.get(point));
            }
        }
    }
}
