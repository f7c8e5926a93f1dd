//! Export facade: select a dialect by name, merge overrides, generate.
//!
//! This is the boundary used by front ends. It never returns an error;
//! failures are reported inside [`ExportResult`].

use postforge_toolpath::Toolpath;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{GeneratorConfig, LineEnding};
use crate::dialect::Dialect;
use crate::engine::GenerationEngine;
use crate::error::PostError;
use crate::hooks::HookSet;

/// Overrides applied on top of a base configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Starting configuration; defaults for the dialect if absent.
    pub base: Option<GeneratorConfig>,
    /// Program name override.
    pub program_name: Option<String>,
    /// Tool name override.
    pub tool_name: Option<String>,
    /// Line ending override.
    pub line_ending: Option<LineEnding>,
    /// Hook templates; non-blank entries replace the base templates.
    pub hooks: HookSet,
    /// RAPID TCP offset override (mm).
    pub tcp_offset_z: Option<f64>,
}

impl ExportOptions {
    /// Resolve the configuration for `dialect`.
    pub fn resolve(&self, dialect: Dialect) -> GeneratorConfig {
        let mut config = self.base.clone().unwrap_or_default();
        config.dialect = dialect;
        if let Some(name) = &self.program_name {
            config.program_name = name.clone();
        }
        if let Some(name) = &self.tool_name {
            config.tool_name = name.clone();
        }
        if let Some(ending) = self.line_ending {
            config.line_ending = ending;
        }
        if let Some(offset) = self.tcp_offset_z {
            config.rapid.tcp_offset_z = Some(offset);
        }
        config.hooks.merge(&self.hooks);
        config
    }
}

/// Outcome of an export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    /// Whether a program was produced.
    pub success: bool,
    /// Program text on success.
    pub content: Option<String>,
    /// Explanation on failure.
    pub error: Option<String>,
    /// Resolved dialect.
    pub dialect: Option<Dialect>,
    /// Human-readable dialect name.
    pub display_name: String,
    /// Suggested file extension, without the dot.
    pub extension: String,
    /// Number of lines in the program.
    pub line_count: usize,
    /// Size of the program in bytes.
    pub byte_size: usize,
    /// Motion commands emitted.
    pub motion_count: usize,
    /// Distance over speed estimate (s).
    pub estimated_time_seconds: f64,
}

impl ExportResult {
    fn failure(err: PostError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            ..Default::default()
        }
    }

    /// Suggested file name for a program stem.
    pub fn file_name(&self, stem: &str) -> String {
        if self.extension.is_empty() {
            stem.to_string()
        } else {
            format!("{}.{}", stem, self.extension)
        }
    }
}

/// Generate a program for the dialect named `dialect_name`.
pub fn export_program(toolpath: &Toolpath, dialect_name: &str, options: &ExportOptions) -> ExportResult {
    let dialect: Dialect = match dialect_name.parse() {
        Ok(d) => d,
        Err(err) => {
            warn!(dialect = dialect_name, "export requested for unknown dialect");
            return ExportResult::failure(err);
        }
    };

    let engine = GenerationEngine::new(options.resolve(dialect));
    let program = engine.generate_program(toolpath);

    ExportResult {
        success: true,
        line_count: program.line_count,
        byte_size: program.byte_size(),
        motion_count: program.motion_count,
        estimated_time_seconds: program.estimated_time_seconds,
        content: Some(program.text),
        error: None,
        dialect: Some(dialect),
        display_name: dialect.display_name().to_string(),
        extension: dialect.file_extension().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookPoint;
    use postforge_toolpath::{SegmentKind, ToolpathSegment};

    fn toolpath() -> Toolpath {
        Toolpath::new(vec![ToolpathSegment::new(
            SegmentKind::Perimeter,
            0,
            vec![[10.0, 20.0, 0.0], [30.0, 20.0, 0.0]],
            47.0,
        )])
    }

    #[test]
    fn test_unknown_dialect_is_structured_failure() {
        let result = export_program(&toolpath(), "staubli", &ExportOptions::default());
        assert!(!result.success);
        assert!(result.content.is_none());
        assert!(result.error.unwrap().contains("staubli"));
    }

    #[test]
    fn test_metadata() {
        let result = export_program(&toolpath(), "ABB", &ExportOptions::default());
        assert!(result.success);
        assert_eq!(result.dialect, Some(Dialect::Rapid));
        assert_eq!(result.display_name, "ABB RAPID");
        assert_eq!(result.file_name("part"), "part.mod");
        let content = result.content.as_deref().unwrap();
        assert_eq!(result.byte_size, content.len());
        assert_eq!(result.line_count, content.lines().count());
        assert_eq!(result.motion_count, 2);
        assert!(content.contains(",v50,"));
    }

    #[test]
    fn test_overrides_merge_over_base() {
        let mut base = GeneratorConfig::default();
        base.hooks.set(HookPoint::ProgramStart, "; base start");
        base.hooks.set(HookPoint::ProgramEnd, "; base end");
        let options = ExportOptions {
            base: Some(base),
            program_name: Some("Bracket".into()),
            hooks: HookSet::default().with(HookPoint::ProgramEnd, "; custom end"),
            ..Default::default()
        };
        let config = options.resolve(Dialect::Gcode);
        assert_eq!(config.program_name, "Bracket");
        assert_eq!(config.hooks.get(HookPoint::ProgramStart), "; base start");
        assert_eq!(config.hooks.get(HookPoint::ProgramEnd), "; custom end");

        let content = export_program(&toolpath(), "gcode", &options).content.unwrap();
        assert!(content.contains("; Program: Bracket"));
        assert!(content.contains("; custom end"));
        assert!(!content.contains("; base end"));
    }

    #[test]
    fn test_tcp_override() {
        let options = ExportOptions {
            tcp_offset_z: Some(42.0),
            ..Default::default()
        };
        let content = export_program(&toolpath(), "rapid", &options).content.unwrap();
        assert!(content.contains("[[0,0,42.000],[1,0,0,0]]"));
    }

    #[test]
    fn test_empty_toolpath_succeeds_with_empty_text() {
        let result = export_program(&Toolpath::default(), "krl", &ExportOptions::default());
        assert!(result.success);
        assert_eq!(result.content.as_deref(), Some(""));
        assert_eq!(result.byte_size, 0);
    }
}
