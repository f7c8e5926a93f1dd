//! The single-pass generation engine.
//!
//! The engine walks the toolpath once, in order, and decides *when* things
//! happen: layer changes, process on/off transitions, hook expansion and
//! motion. The selected [`Backend`] decides *how* each event is written.
//!
//! Process-on and process-off strictly bracket every contiguous run of
//! non-travel segments. A run never stays active across a travel segment and
//! never toggles more than once.

use postforge_math::{distance, normal_to_euler, EulerZyx};
use postforge_toolpath::{Toolpath, ToolpathSegment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::{Backend, VendorBackend};
use crate::config::GeneratorConfig;
use crate::context::PointContext;
use crate::dialect::Dialect;
use crate::hooks::{HookPoint, HookSet};
use crate::template::{expand, TemplateVars};

/// Mutable state of one generation run.
///
/// Created at the start of a run, owned by it and dropped at the end.
#[derive(Debug, Clone, Default)]
pub struct GenerationState {
    /// Output lines accumulated so far.
    pub lines: Vec<String>,
    /// Layer most recently opened.
    pub current_layer: Option<u32>,
    /// Whether the process is currently active.
    pub depositing: bool,
    /// Running time estimate (s).
    pub elapsed: f64,
    /// Context of the last emitted motion.
    pub last_context: Option<PointContext>,
    /// Motion commands emitted.
    pub motion_count: usize,
    /// Process-on transitions emitted.
    pub process_on_count: usize,
    /// Process-off transitions emitted.
    pub process_off_count: usize,
    /// Layers opened.
    pub layer_count: usize,
}

/// A generated program with its run statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Dialect the program is written in.
    pub dialect: Dialect,
    /// Complete program text, terminated by the configured line ending.
    pub text: String,
    /// Number of lines.
    pub line_count: usize,
    /// Motion commands emitted.
    pub motion_count: usize,
    /// Process-on transitions.
    pub process_on_count: usize,
    /// Process-off transitions.
    pub process_off_count: usize,
    /// Layers opened.
    pub layer_count: usize,
    /// Distance over speed estimate (s).
    pub estimated_time_seconds: f64,
}

impl Program {
    /// Whether the program has no text (empty toolpath).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Size of the text in bytes.
    pub fn byte_size(&self) -> usize {
        self.text.len()
    }
}

/// Translates toolpaths into programs for one configuration.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    config: GeneratorConfig,
}

impl GenerationEngine {
    /// Create an engine for a configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Engine with default settings for a dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(GeneratorConfig::for_dialect(dialect))
    }

    /// Active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the program text.
    ///
    /// An empty toolpath yields an empty string.
    pub fn generate(&self, toolpath: &Toolpath) -> String {
        self.generate_program(toolpath).text
    }

    /// Generate the program text together with run statistics.
    pub fn generate_program(&self, toolpath: &Toolpath) -> Program {
        let dialect = self.config.dialect;
        if toolpath.is_empty() {
            debug!(%dialect, "empty toolpath, nothing to generate");
            return Program {
                dialect,
                ..Default::default()
            };
        }

        let mut walk = Walk {
            backend: Backend::for_config(&self.config),
            hooks: &self.config.hooks,
            tool_name: &self.config.tool_name,
            state: GenerationState::default(),
        };
        walk.run(toolpath);
        let state = walk.state;

        let terminator = self.config.line_ending.as_str();
        let mut text = state.lines.join(terminator);
        text.push_str(terminator);

        info!(
            %dialect,
            lines = state.lines.len(),
            motions = state.motion_count,
            layers = state.layer_count,
            estimated_time = state.elapsed,
            "generated program"
        );

        Program {
            dialect,
            text,
            line_count: state.lines.len(),
            motion_count: state.motion_count,
            process_on_count: state.process_on_count,
            process_off_count: state.process_off_count,
            layer_count: state.layer_count,
            estimated_time_seconds: state.elapsed,
        }
    }
}

/// One pass over a toolpath.
struct Walk<'a> {
    backend: Backend,
    hooks: &'a HookSet,
    tool_name: &'a str,
    state: GenerationState,
}

impl Walk<'_> {
    fn run(&mut self, toolpath: &Toolpath) {
        let header = self.backend.header(&toolpath.summary());
        self.emit(header);

        let start = toolpath
            .non_empty_segments()
            .next()
            .map(|seg| PointContext::for_point(seg, 0, orientation_of(seg), 0.0))
            .unwrap_or_default();
        self.hook(HookPoint::ProgramStart, &start);
        self.hook(HookPoint::ToolChange, &start);

        for (i, segment) in toolpath.segments.iter().enumerate() {
            if segment.is_empty() {
                debug!(segment = i, layer = segment.layer, "skipping empty segment");
                continue;
            }
            self.segment(segment);
        }

        let last = self.state.last_context.clone().unwrap_or(start);
        if self.state.depositing {
            self.process_off(&last);
        }
        if self.state.current_layer.is_some() {
            self.hook(HookPoint::LayerEnd, &last);
        }
        self.hook(HookPoint::ProgramEnd, &last);
        let footer = self.backend.footer();
        self.emit(footer);
    }

    fn segment(&mut self, segment: &ToolpathSegment) {
        let orientation = orientation_of(segment);
        let first = self.context(segment, 0, orientation);

        if self.state.current_layer != Some(segment.layer) {
            if self.state.current_layer.is_some() {
                let last = self.state.last_context.clone().unwrap_or_else(|| first.clone());
                self.hook(HookPoint::LayerEnd, &last);
            }
            debug!(layer = segment.layer, "layer change");
            let code = self.backend.layer_change(segment.layer);
            self.emit(code);
            self.hook(HookPoint::LayerStart, &first);
            self.state.current_layer = Some(segment.layer);
            self.state.layer_count += 1;
        }

        let travel = segment.kind.is_travel();
        if travel && self.state.depositing {
            let last = self.state.last_context.clone().unwrap_or_else(|| first.clone());
            self.process_off(&last);
        } else if !travel && !self.state.depositing {
            self.process_on(&first);
        }

        self.hook(HookPoint::SegmentStart, &first);
        for index in 0..segment.points.len() {
            let ctx = if index == 0 {
                first.clone()
            } else {
                self.context(segment, index, orientation)
            };
            self.point(&ctx, travel);
        }
        let last = self.state.last_context.clone().unwrap_or(first);
        self.hook(HookPoint::SegmentEnd, &last);
    }

    fn point(&mut self, ctx: &PointContext, travel: bool) {
        self.hook(HookPoint::BeforePoint, ctx);
        let motion = if travel || ctx.first_in_segment {
            self.backend.traveling_move(ctx)
        } else {
            self.backend.depositing_move(ctx)
        };
        self.emit(motion);
        self.state.motion_count += 1;
        self.state.last_context = Some(ctx.clone());
        self.hook(HookPoint::AfterPoint, ctx);
    }

    /// Build the context for a point, advancing the time estimate to it.
    fn context(
        &mut self,
        segment: &ToolpathSegment,
        index: usize,
        orientation: EulerZyx,
    ) -> PointContext {
        let position = segment.points[index];
        if let Some(prev) = self.state.last_context.as_ref().map(|c| c.position) {
            if segment.speed > 0.0 {
                self.state.elapsed += distance(prev, position) / segment.speed;
            }
        }
        PointContext::for_point(segment, index, orientation, self.state.elapsed)
    }

    fn process_on(&mut self, ctx: &PointContext) {
        self.hook(HookPoint::Prime, ctx);
        let code = self.backend.process_on(ctx);
        self.emit(code);
        self.hook(HookPoint::ProcessOn, ctx);
        self.state.depositing = true;
        self.state.process_on_count += 1;
    }

    fn process_off(&mut self, ctx: &PointContext) {
        let code = self.backend.process_off(ctx);
        self.emit(code);
        self.hook(HookPoint::ProcessOff, ctx);
        self.hook(HookPoint::Retract, ctx);
        self.state.depositing = false;
        self.state.process_off_count += 1;
    }

    /// Expand a hook and route each non-blank line through the backend.
    fn hook(&mut self, point: HookPoint, ctx: &PointContext) {
        let hooks = self.hooks;
        let template = hooks.get(point);
        if template.trim().is_empty() {
            return;
        }
        let expanded = expand(template, &TemplateVars::new(ctx, self.tool_name));
        for line in expanded.lines().filter(|l| !l.trim().is_empty()) {
            let line = self.backend.instruction(line);
            self.state.lines.push(line);
        }
    }

    fn emit(&mut self, lines: Vec<String>) {
        self.state.lines.extend(lines);
    }
}

fn orientation_of(segment: &ToolpathSegment) -> EulerZyx {
    normal_to_euler(&segment.normal_or_up())
}
