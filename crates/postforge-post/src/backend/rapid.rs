//! ABB RAPID backend.
//!
//! Emits one module with a `main` procedure. Targets are inline robtargets
//! `[[x,y,z],[q1,q2,q3,q4],[cf1,cf4,cf6,cfx],[eax_a..eax_f]]` with the
//! orientation quaternion in `(w, x, y, z)` order. Speeds and blend zones
//! snap to the controller's predefined `speeddata` / `zonedata` values.

use postforge_toolpath::ToolpathSummary;

use super::{format_coord, sanitize_identifier, summary_lines, VendorBackend};
use crate::config::{GeneratorConfig, RapidSettings, DEFAULT_TCP_OFFSET_Z};
use crate::context::PointContext;
use crate::dialect::Dialect;

/// Predefined `speeddata` TCP speeds (mm/s), ascending.
pub const SPEED_PRESETS: [f64; 25] = [
    5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 80.0, 100.0, 150.0, 200.0, 300.0, 400.0, 500.0,
    600.0, 800.0, 1000.0, 1500.0, 2000.0, 2500.0, 3000.0, 4000.0, 5000.0, 6000.0, 7000.0,
];

/// Predefined `zonedata` radii (mm), ascending; `0` means `fine`.
pub const ZONE_PRESETS: [f64; 14] = [
    0.0, 1.0, 5.0, 10.0, 15.0, 20.0, 30.0, 40.0, 50.0, 60.0, 80.0, 100.0, 150.0, 200.0,
];

const INDENT: &str = "    ";
const CONFIG_PLACEHOLDER: &str = "[0,0,0,0]";
const EXTAX_PLACEHOLDER: &str = "[9E9,9E9,9E9,9E9,9E9,9E9]";

/// Closest table entry by absolute difference; on an exact tie the
/// earlier (lower) entry wins. `None` for an empty table.
pub fn nearest_preset(table: &[f64], value: f64) -> Option<f64> {
    table
        .iter()
        .copied()
        .min_by(|a, b| (value - a).abs().total_cmp(&(value - b).abs()))
}

/// Emits RAPID `MoveL` / `MoveJ` with quaternion targets.
#[derive(Debug, Clone)]
pub struct RapidBackend {
    module_name: String,
    tool_name: String,
    settings: RapidSettings,
}

impl RapidBackend {
    /// Create from a configuration.
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            module_name: sanitize_identifier(&config.program_name, 32, false),
            tool_name: sanitize_identifier(&config.tool_name, 32, false),
            settings: config.rapid.clone(),
        }
    }

    fn speed_name(speed: f64) -> String {
        format!("v{}", nearest_preset(&SPEED_PRESETS, speed).unwrap_or(speed))
    }

    fn zone_name(&self) -> String {
        let radius = self.settings.blend_radius;
        let zone = nearest_preset(&ZONE_PRESETS, radius).unwrap_or(radius);
        if zone == 0.0 {
            "fine".into()
        } else {
            format!("z{}", zone)
        }
    }

    fn robtarget(ctx: &PointContext) -> String {
        let q = ctx.orientation.to_quaternion();
        format!(
            "[[{},{},{}],[{},{},{},{}],{},{}]",
            format_coord(ctx.x(), 3),
            format_coord(ctx.y(), 3),
            format_coord(ctx.z(), 3),
            format_coord(q.w(), 6),
            format_coord(q.x(), 6),
            format_coord(q.y(), 6),
            format_coord(q.z(), 6),
            CONFIG_PLACEHOLDER,
            EXTAX_PLACEHOLDER,
        )
    }

    fn motion(&self, instruction: &str, ctx: &PointContext, speed: f64) -> String {
        format!(
            "{}{} {},{},{},{}\\WObj:={};",
            INDENT,
            instruction,
            Self::robtarget(ctx),
            Self::speed_name(speed),
            self.zone_name(),
            self.tool_name,
            self.settings.work_object,
        )
    }
}

impl VendorBackend for RapidBackend {
    fn header(&mut self, summary: &ToolpathSummary) -> Vec<String> {
        let tcp_z = self
            .settings
            .tcp_offset_z
            .or(summary.tool_offset_z)
            .unwrap_or(DEFAULT_TCP_OFFSET_Z);

        let mut lines = vec![format!("MODULE {}", self.module_name)];
        lines.extend(
            summary_lines(Dialect::Rapid, &self.module_name, summary)
                .iter()
                .map(|l| format!("  ! {}", l)),
        );
        lines.push(format!(
            "  PERS tooldata {} := [TRUE,[[0,0,{}],[1,0,0,0]],[{},[0,0,{}],[1,0,0,0],0,0,0]];",
            self.tool_name,
            format_coord(tcp_z, 3),
            format_coord(self.settings.tool_mass, 3),
            format_coord(tcp_z / 2.0, 3),
        ));
        lines.push(format!(
            "  PERS wobjdata {} := [FALSE,TRUE,\"\",[[0,0,0],[1,0,0,0]],[[0,0,0],[1,0,0,0]]];",
            self.settings.work_object
        ));
        lines.push("  PROC main()".into());
        lines.push(format!("{}ConfL \\Off;", INDENT));
        lines.push(format!("{}ConfJ \\Off;", INDENT));
        lines
    }

    fn footer(&mut self) -> Vec<String> {
        vec!["  ENDPROC".into(), "ENDMODULE".into()]
    }

    fn depositing_move(&mut self, ctx: &PointContext) -> Vec<String> {
        vec![self.motion("MoveL", ctx, ctx.speed)]
    }

    fn traveling_move(&mut self, ctx: &PointContext) -> Vec<String> {
        let speed = ctx.speed.max(self.settings.travel_speed);
        vec![self.motion("MoveJ", ctx, speed)]
    }

    fn comment(&mut self, text: &str) -> String {
        format!("{}! {}", INDENT, text)
    }

    fn process_on(&mut self, _ctx: &PointContext) -> Vec<String> {
        vec![format!("{}SetDO {}, 1;", INDENT, self.settings.process_signal)]
    }

    fn process_off(&mut self, _ctx: &PointContext) -> Vec<String> {
        vec![format!("{}SetDO {}, 0;", INDENT, self.settings.process_signal)]
    }

    fn layer_change(&mut self, layer: u32) -> Vec<String> {
        vec![self.comment(&format!("Layer {}", layer))]
    }

    fn instruction(&mut self, text: &str) -> String {
        format!("{}{}", INDENT, text.trim_start())
    }
}
