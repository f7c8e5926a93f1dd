//! Generator configuration.
//!
//! One record selects the dialect and carries the settings of every backend,
//! so a single file can drive any target. All fields default, which makes
//! partial TOML or JSON documents valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::Result;
use crate::hooks::HookSet;

/// TCP standoff used by RAPID when neither the configuration nor the toolpath sets one (mm).
pub const DEFAULT_TCP_OFFSET_Z: f64 = 100.0;

/// Line terminator of the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

impl LineEnding {
    /// The terminator characters.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Settings for generic G-code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcodeSettings {
    /// Command that starts the process (spindle, extruder, torch).
    pub process_on_code: String,
    /// Command that stops the process.
    pub process_off_code: String,
    /// Program end command.
    pub end_code: String,
}

impl Default for GcodeSettings {
    fn default() -> Self {
        Self {
            process_on_code: "M3".into(),
            process_off_code: "M5".into(),
            end_code: "M30".into(),
        }
    }
}

/// Settings for ABB RAPID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RapidSettings {
    /// TCP offset along tool Z (mm); falls back to the toolpath, then [`DEFAULT_TCP_OFFSET_Z`].
    pub tcp_offset_z: Option<f64>,
    /// Tool mass (kg).
    pub tool_mass: f64,
    /// Blend radius for linear moves (mm), snapped to a zone preset.
    pub blend_radius: f64,
    /// Minimum speed for joint (travel) moves (mm/s), snapped to a speed preset.
    pub travel_speed: f64,
    /// Digital output that switches the process.
    pub process_signal: String,
    /// Work object name.
    pub work_object: String,
}

impl Default for RapidSettings {
    fn default() -> Self {
        Self {
            tcp_offset_z: None,
            tool_mass: 1.0,
            blend_radius: 1.0,
            travel_speed: 200.0,
            process_signal: "doProcess".into(),
            work_object: "wobjPart".into(),
        }
    }
}

/// Settings for KUKA KRL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KrlSettings {
    /// Cartesian approximation distance `$APO.CDIS` (mm).
    pub blend_distance: f64,
    /// `$OUT` index that switches the process.
    pub process_output: u32,
    /// `TOOL_DATA` index.
    pub tool_index: u32,
    /// `BASE_DATA` index.
    pub base_index: u32,
}

impl Default for KrlSettings {
    fn default() -> Self {
        Self {
            blend_distance: 1.0,
            process_output: 1,
            tool_index: 1,
            base_index: 1,
        }
    }
}

/// Settings for FANUC TP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanucSettings {
    /// User frame number.
    pub uframe: u32,
    /// User tool number.
    pub utool: u32,
    /// Continuous-path termination value (0 = FINE).
    pub cnt: u32,
    /// Joint move speed (% of max).
    pub joint_speed_percent: u32,
    /// `DO` index that switches the process.
    pub process_output: u32,
}

impl Default for FanucSettings {
    fn default() -> Self {
        Self {
            uframe: 1,
            utool: 1,
            cnt: 100,
            joint_speed_percent: 100,
            process_output: 1,
        }
    }
}

/// Complete configuration of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Output dialect.
    pub dialect: Dialect,
    /// Program / module / routine name.
    pub program_name: String,
    /// Tool name (`{toolName}`, RAPID tooldata name).
    pub tool_name: String,
    /// Line terminator.
    pub line_ending: LineEnding,
    /// Hook templates.
    pub hooks: HookSet,
    /// G-code settings.
    pub gcode: GcodeSettings,
    /// RAPID settings.
    pub rapid: RapidSettings,
    /// KRL settings.
    pub krl: KrlSettings,
    /// FANUC settings.
    pub fanuc: FanucSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Gcode,
            program_name: "postforge_program".into(),
            tool_name: "tool1".into(),
            line_ending: LineEnding::Lf,
            hooks: HookSet::default(),
            gcode: GcodeSettings::default(),
            rapid: RapidSettings::default(),
            krl: KrlSettings::default(),
            fanuc: FanucSettings::default(),
        }
    }
}

impl GeneratorConfig {
    /// Default configuration for a dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.json` or (any other extension) TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }
}
