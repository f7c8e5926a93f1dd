//! KUKA KRL backend.
//!
//! Positions are inline `FRAME` aggregates with the orientation given as
//! `A` (about Z), `B` (about Y) and `C` (about X) in degrees, which is the
//! same ZYX decomposition the engine computes.

use postforge_toolpath::ToolpathSummary;

use super::{format_coord, sanitize_identifier, summary_lines, VendorBackend};
use crate::config::{GeneratorConfig, KrlSettings};
use crate::context::PointContext;
use crate::dialect::Dialect;

/// KRL module names are limited to 24 characters.
const MAX_NAME_LEN: usize = 24;

/// Emits `LIN` / `PTP` with Cartesian frames.
#[derive(Debug, Clone)]
pub struct KrlBackend {
    program_name: String,
    settings: KrlSettings,
}

impl KrlBackend {
    /// Create from a configuration.
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            program_name: sanitize_identifier(&config.program_name, MAX_NAME_LEN, false),
            settings: config.krl.clone(),
        }
    }

    fn frame(ctx: &PointContext) -> String {
        let o = &ctx.orientation;
        format!(
            "{{X {}, Y {}, Z {}, A {}, B {}, C {}}}",
            format_coord(ctx.x(), 3),
            format_coord(ctx.y(), 3),
            format_coord(ctx.z(), 3),
            format_coord(o.yaw_deg(), 3),
            format_coord(o.pitch_deg(), 3),
            format_coord(o.roll_deg(), 3),
        )
    }
}

impl VendorBackend for KrlBackend {
    fn header(&mut self, summary: &ToolpathSummary) -> Vec<String> {
        let mut lines = vec![format!("DEF {}()", self.program_name)];
        lines.extend(
            summary_lines(Dialect::Krl, &self.program_name, summary)
                .iter()
                .map(|l| format!("; {}", l)),
        );
        lines.push(";FOLD INI".into());
        lines.push("BAS(#INITMOV, 0)".into());
        lines.push(";ENDFOLD".into());
        lines.push(format!("$TOOL = TOOL_DATA[{}]", self.settings.tool_index));
        lines.push(format!("$BASE = BASE_DATA[{}]", self.settings.base_index));
        lines.push(format!(
            "$APO.CDIS = {}",
            format_coord(self.settings.blend_distance, 3)
        ));
        lines
    }

    fn footer(&mut self) -> Vec<String> {
        vec!["END".into()]
    }

    fn depositing_move(&mut self, ctx: &PointContext) -> Vec<String> {
        let mut lines = Vec::with_capacity(2);
        // Index 0 is the approach; the first depositing point sets the path speed.
        if ctx.point_index == 1 {
            lines.push(format!("$VEL.CP = {}", format_coord(ctx.speed / 1000.0, 4)));
        }
        lines.push(format!("LIN {} C_DIS", Self::frame(ctx)));
        lines
    }

    fn traveling_move(&mut self, ctx: &PointContext) -> Vec<String> {
        vec![format!("PTP {}", Self::frame(ctx))]
    }

    fn comment(&mut self, text: &str) -> String {
        format!("; {}", text)
    }

    fn process_on(&mut self, _ctx: &PointContext) -> Vec<String> {
        vec![format!("$OUT[{}] = TRUE", self.settings.process_output)]
    }

    fn process_off(&mut self, _ctx: &PointContext) -> Vec<String> {
        vec![format!("$OUT[{}] = FALSE", self.settings.process_output)]
    }

    fn layer_change(&mut self, layer: u32) -> Vec<String> {
        vec![self.comment(&format!("Layer {}", layer))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postforge_math::EulerZyx;
    use postforge_toolpath::SegmentKind;

    fn ctx(point_index: usize) -> PointContext {
        PointContext {
            position: [10.0, 20.0, 0.0],
            orientation: EulerZyx::TOOL_DOWN,
            speed: 25.0,
            kind: SegmentKind::Perimeter,
            point_index,
            ..Default::default()
        }
    }

    #[test]
    fn test_frame_uses_abc_degrees() {
        let mut b = KrlBackend::new(&GeneratorConfig::for_dialect(Dialect::Krl));
        assert_eq!(
            b.traveling_move(&ctx(0)),
            vec!["PTP {X 10.000, Y 20.000, Z 0.000, A 0.000, B 0.000, C 180.000}"]
        );
    }

    #[test]
    fn test_velocity_on_first_depositing_point() {
        let mut b = KrlBackend::new(&GeneratorConfig::for_dialect(Dialect::Krl));
        let first = b.depositing_move(&ctx(1));
        assert_eq!(first.len(), 2);
        assert_eq!(first[0], "$VEL.CP = 0.0250");
        assert!(first[1].starts_with("LIN {X 10.000"));
        assert!(first[1].ends_with("} C_DIS"));
        assert_eq!(b.depositing_move(&ctx(2)).len(), 1);
    }

    #[test]
    fn test_def_end_pair() {
        let mut config = GeneratorConfig::for_dialect(Dialect::Krl);
        config.program_name = "a very long program name for kuka".into();
        config.krl.tool_index = 4;
        let mut b = KrlBackend::new(&config);
        let summary = ToolpathSummary {
            total_layers: 1,
            layer_height: 0.0,
            total_points: 0,
            total_segments: 0,
            tool_offset_z: None,
        };
        let header = b.header(&summary);
        assert_eq!(header[0], "DEF a_very_long_program_name()");
        assert!(header.contains(&"$TOOL = TOOL_DATA[4]".to_string()));
        assert_eq!(b.footer(), vec!["END"]);
    }

    #[test]
    fn test_process_outputs() {
        let mut config = GeneratorConfig::for_dialect(Dialect::Krl);
        config.krl.process_output = 12;
        let mut b = KrlBackend::new(&config);
        assert_eq!(b.process_on(&ctx(0)), vec!["$OUT[12] = TRUE"]);
        assert_eq!(b.process_off(&ctx(0)), vec!["$OUT[12] = FALSE"]);
    }
}
