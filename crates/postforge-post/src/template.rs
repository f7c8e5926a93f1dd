//! Hook template expansion.
//!
//! A template is plain text with `{name}` placeholders drawn from a closed
//! set of per-point variables. Placeholders that do not name a known
//! variable are left in the output verbatim, braces included.

use std::collections::BTreeMap;

use crate::backend::format_coord;
use crate::context::PointContext;

/// Names of every variable a template may reference.
pub const VARIABLES: [&str; 13] = [
    "x",
    "y",
    "z",
    "rx",
    "ry",
    "rz",
    "speed",
    "depositionFactor",
    "segmentType",
    "layerIndex",
    "time",
    "toolName",
    "pointIndex",
];

/// Resolved variable values for one expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars {
    values: BTreeMap<&'static str, String>,
}

impl TemplateVars {
    /// Format every variable for `ctx`.
    pub fn new(ctx: &PointContext, tool_name: &str) -> Self {
        let o = &ctx.orientation;
        let values = BTreeMap::from([
            ("x", format_coord(ctx.x(), 3)),
            ("y", format_coord(ctx.y(), 3)),
            ("z", format_coord(ctx.z(), 3)),
            ("rx", format_coord(o.roll_deg(), 3)),
            ("ry", format_coord(o.pitch_deg(), 3)),
            ("rz", format_coord(o.yaw_deg(), 3)),
            ("speed", format_coord(ctx.speed, 1)),
            ("depositionFactor", format_coord(ctx.deposition_rate, 4)),
            ("segmentType", ctx.kind.as_str().to_string()),
            ("layerIndex", ctx.layer.to_string()),
            ("time", format_coord(ctx.elapsed, 1)),
            ("toolName", tool_name.to_string()),
            ("pointIndex", ctx.point_index.to_string()),
        ]);
        Self { values }
    }

    /// Value of a variable, if it exists.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Substitute `{name}` placeholders in `template`.
///
/// Unknown names and unmatched braces are copied through unchanged.
pub fn expand(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find(|c: char| c == '{' || c == '}') {
            Some(close) if after[close..].starts_with('}') => {
                let name = &after[..close];
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                // Stray or nested brace: keep it and rescan from the next char.
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use postforge_math::EulerZyx;
    use postforge_toolpath::SegmentKind;

    fn ctx() -> PointContext {
        PointContext {
            position: [10.0, 20.5, -0.00001],
            orientation: EulerZyx::new(0.0, 0.0, std::f64::consts::PI),
            speed: 47.0,
            deposition_rate: 1.0,
            kind: SegmentKind::Infill,
            layer: 3,
            point_index: 7,
            elapsed: 12.34,
            first_in_segment: false,
            last_in_segment: false,
        }
    }

    #[test]
    fn test_all_variables_resolve() {
        let vars = TemplateVars::new(&ctx(), "nozzle");
        for name in VARIABLES {
            assert!(vars.get(name).is_some(), "missing {name}");
        }
        let out = expand(
            "X{x} Y{y} Z{z} A{rx} B{ry} C{rz} F{speed} E{depositionFactor} \
             {segmentType} L{layerIndex} T{time} {toolName} #{pointIndex}",
            &vars,
        );
        assert_eq!(
            out,
            "X10.000 Y20.500 Z0.000 A180.000 B0.000 C0.000 F47.0 E1.0000 \
             infill L3 T12.3 nozzle #7"
        );
    }

    #[test]
    fn test_unknown_placeholder_is_verbatim() {
        let vars = TemplateVars::new(&ctx(), "nozzle");
        assert_eq!(expand("M117 {bogus} at {x}", &vars), "M117 {bogus} at 10.000");
    }

    #[test]
    fn test_unbalanced_braces() {
        let vars = TemplateVars::new(&ctx(), "nozzle");
        assert_eq!(expand("open { only", &vars), "open { only");
        assert_eq!(expand("close } only", &vars), "close } only");
        assert_eq!(expand("{{x}}", &vars), "{10.000}");
        assert_eq!(expand("{}", &vars), "{}");
    }

    #[test]
    fn test_plain_text_untouched() {
        let vars = TemplateVars::new(&ctx(), "nozzle");
        assert_eq!(expand("G92 E0", &vars), "G92 E0");
        assert_eq!(expand("", &vars), "");
    }
}
