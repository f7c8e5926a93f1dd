//! Vendor backends that turn engine events into dialect-specific text.

mod fanuc;
mod gcode;
mod krl;
mod rapid;

pub use fanuc::FanucBackend;
pub use gcode::GcodeBackend;
pub use krl::KrlBackend;
pub use rapid::{nearest_preset, RapidBackend, SPEED_PRESETS, ZONE_PRESETS};

use postforge_toolpath::ToolpathSummary;

use crate::config::GeneratorConfig;
use crate::context::PointContext;
use crate::dialect::Dialect;

/// Syntax-specific decisions for one dialect.
///
/// The engine owns the walk; a backend only formats. Process and layer
/// methods default to emitting nothing. Every hook line is routed through
/// [`VendorBackend::instruction`] so dialects with numbered or indented
/// bodies stay well-formed.
pub trait VendorBackend {
    /// Program preamble.
    fn header(&mut self, summary: &ToolpathSummary) -> Vec<String>;

    /// Program trailer.
    fn footer(&mut self) -> Vec<String>;

    /// Motion while the process is active.
    fn depositing_move(&mut self, ctx: &PointContext) -> Vec<String>;

    /// Motion with the process idle (travel, approach).
    fn traveling_move(&mut self, ctx: &PointContext) -> Vec<String>;

    /// A single comment line.
    fn comment(&mut self, text: &str) -> String;

    /// Switch the process on before the first point of a run.
    fn process_on(&mut self, _ctx: &PointContext) -> Vec<String> {
        Vec::new()
    }

    /// Switch the process off after a run.
    fn process_off(&mut self, _ctx: &PointContext) -> Vec<String> {
        Vec::new()
    }

    /// Code emitted when a new layer starts.
    fn layer_change(&mut self, _layer: u32) -> Vec<String> {
        Vec::new()
    }

    /// Wrap one line of user-supplied hook text.
    fn instruction(&mut self, text: &str) -> String {
        text.to_string()
    }
}

/// The closed set of backends, one variant per [`Dialect`].
#[derive(Debug, Clone)]
pub enum Backend {
    /// Generic G-code.
    Gcode(GcodeBackend),
    /// ABB RAPID.
    Rapid(RapidBackend),
    /// KUKA KRL.
    Krl(KrlBackend),
    /// FANUC TP.
    Fanuc(FanucBackend),
}

macro_rules! dispatch {
    ($self:ident, $b:ident => $e:expr) => {
        match $self {
            Backend::Gcode($b) => $e,
            Backend::Rapid($b) => $e,
            Backend::Krl($b) => $e,
            Backend::Fanuc($b) => $e,
        }
    };
}

impl Backend {
    /// Fresh backend for the configured dialect.
    pub fn for_config(config: &GeneratorConfig) -> Self {
        match config.dialect {
            Dialect::Gcode => Backend::Gcode(GcodeBackend::new(config)),
            Dialect::Rapid => Backend::Rapid(RapidBackend::new(config)),
            Dialect::Krl => Backend::Krl(KrlBackend::new(config)),
            Dialect::Fanuc => Backend::Fanuc(FanucBackend::new(config)),
        }
    }
}

impl VendorBackend for Backend {
    fn header(&mut self, summary: &ToolpathSummary) -> Vec<String> {
        dispatch!(self, b => b.header(summary))
    }

    fn footer(&mut self) -> Vec<String> {
        dispatch!(self, b => b.footer())
    }

    fn depositing_move(&mut self, ctx: &PointContext) -> Vec<String> {
        dispatch!(self, b => b.depositing_move(ctx))
    }

    fn traveling_move(&mut self, ctx: &PointContext) -> Vec<String> {
        dispatch!(self, b => b.traveling_move(ctx))
    }

    fn comment(&mut self, text: &str) -> String {
        dispatch!(self, b => b.comment(text))
    }

    fn process_on(&mut self, ctx: &PointContext) -> Vec<String> {
        dispatch!(self, b => b.process_on(ctx))
    }

    fn process_off(&mut self, ctx: &PointContext) -> Vec<String> {
        dispatch!(self, b => b.process_off(ctx))
    }

    fn layer_change(&mut self, layer: u32) -> Vec<String> {
        dispatch!(self, b => b.layer_change(layer))
    }

    fn instruction(&mut self, text: &str) -> String {
        dispatch!(self, b => b.instruction(text))
    }
}

/// Format a floating point value with fixed precision.
///
/// Values that round to zero are printed without a sign.
pub fn format_coord(value: f64, precision: usize) -> String {
    let s = format!("{:.prec$}", value, prec = precision);
    match s.strip_prefix('-') {
        Some(unsigned) if unsigned.bytes().all(|b| b == b'0' || b == b'.') => unsigned.to_string(),
        _ => s,
    }
}

/// Reduce a name to a controller identifier: ASCII letters, digits and `_`,
/// starting with a letter, at most `max_len` characters.
pub fn sanitize_identifier(name: &str, max_len: usize, uppercase: bool) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if !ident.starts_with(|c: char| c.is_ascii_alphabetic()) {
        ident.insert(0, 'P');
    }
    if uppercase {
        ident.make_ascii_uppercase();
    }
    ident.truncate(max_len);
    ident
}

/// Standard header comment lines shared by every dialect.
pub(crate) fn summary_lines(dialect: Dialect, program: &str, summary: &ToolpathSummary) -> Vec<String> {
    vec![
        format!("Generated by postforge ({})", dialect.display_name()),
        format!("Program: {}", program),
        format!("Layers: {}", summary.total_layers),
        format!("Layer height: {} mm", format_coord(summary.layer_height, 3)),
        format!("Segments: {}", summary.total_segments),
        format!("Points: {}", summary.total_points),
    ]
}
