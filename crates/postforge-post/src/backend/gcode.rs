//! Generic G-code backend.

use postforge_toolpath::ToolpathSummary;

use super::{format_coord, summary_lines, VendorBackend};
use crate::config::{GcodeSettings, GeneratorConfig};
use crate::context::PointContext;
use crate::dialect::Dialect;

/// Emits `G0`/`G1` position-only motion in millimetres.
#[derive(Debug, Clone)]
pub struct GcodeBackend {
    program_name: String,
    settings: GcodeSettings,
}

impl GcodeBackend {
    /// Create from a configuration.
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            program_name: config.program_name.clone(),
            settings: config.gcode.clone(),
        }
    }

    fn axes(ctx: &PointContext) -> String {
        format!(
            "X{} Y{} Z{}",
            format_coord(ctx.x(), 3),
            format_coord(ctx.y(), 3),
            format_coord(ctx.z(), 3)
        )
    }
}

impl VendorBackend for GcodeBackend {
    fn header(&mut self, summary: &ToolpathSummary) -> Vec<String> {
        let mut lines: Vec<String> = summary_lines(Dialect::Gcode, &self.program_name, summary)
            .iter()
            .map(|l| self.comment(l))
            .collect();
        lines.push("G21 ; units: millimetres".into());
        lines.push("G90 ; absolute positioning".into());
        lines
    }

    fn footer(&mut self) -> Vec<String> {
        vec![format!("{} ; program end", self.settings.end_code)]
    }

    fn depositing_move(&mut self, ctx: &PointContext) -> Vec<String> {
        // Toolpath speeds are mm/s, feed is mm/min.
        vec![format!(
            "G1 {} F{}",
            Self::axes(ctx),
            format_coord(ctx.speed * 60.0, 1)
        )]
    }

    fn traveling_move(&mut self, ctx: &PointContext) -> Vec<String> {
        vec![format!("G0 {}", Self::axes(ctx))]
    }

    fn comment(&mut self, text: &str) -> String {
        format!("; {}", text)
    }

    fn process_on(&mut self, _ctx: &PointContext) -> Vec<String> {
        vec![format!("{} ; process on", self.settings.process_on_code)]
    }

    fn process_off(&mut self, _ctx: &PointContext) -> Vec<String> {
        vec![format!("{} ; process off", self.settings.process_off_code)]
    }

    fn layer_change(&mut self, layer: u32) -> Vec<String> {
        vec![self.comment(&format!("LAYER:{}", layer))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postforge_toolpath::SegmentKind;

    fn backend() -> GcodeBackend {
        GcodeBackend::new(&GeneratorConfig::default())
    }

    fn summary() -> ToolpathSummary {
        ToolpathSummary {
            total_layers: 2,
            layer_height: 0.2,
            total_points: 10,
            total_segments: 3,
            tool_offset_z: None,
        }
    }

    #[test]
    fn test_units_before_motion() {
        let header = backend().header(&summary());
        let units = header.iter().position(|l| l.starts_with("G21")).unwrap();
        assert_eq!(units, header.len() - 2);
        assert!(header.iter().any(|l| l == "; Layer height: 0.200 mm"));
        assert!(header[..units].iter().all(|l| l.starts_with("; ")));
    }

    #[test]
    fn test_moves() {
        let ctx = PointContext {
            position: [30.0, 20.0, 0.2],
            speed: 40.0,
            kind: SegmentKind::Perimeter,
            ..Default::default()
        };
        let mut b = backend();
        assert_eq!(b.traveling_move(&ctx), vec!["G0 X30.000 Y20.000 Z0.200"]);
        assert_eq!(b.depositing_move(&ctx), vec!["G1 X30.000 Y20.000 Z0.200 F2400.0"]);
    }

    #[test]
    fn test_process_codes_configurable() {
        let mut config = GeneratorConfig::default();
        config.gcode.process_on_code = "M106 S255".into();
        let mut b = GcodeBackend::new(&config);
        assert_eq!(
            b.process_on(&PointContext::default()),
            vec!["M106 S255 ; process on"]
        );
        assert_eq!(b.process_off(&PointContext::default()), vec!["M5 ; process off"]);
        assert_eq!(b.footer(), vec!["M30 ; program end"]);
    }
}
