#![warn(missing_docs)]

//! Program generation for postforge.
//!
//! This crate converts a vendor-neutral [`Toolpath`] into a motion program
//! for generic G-code controllers or for ABB RAPID, KUKA KRL and FANUC TP
//! robot controllers. One engine walks the toolpath; a backend per dialect
//! formats the result.
//!
//! # Example
//!
//! ```
//! use postforge_post::{Dialect, GenerationEngine};
//! use postforge_toolpath::{SegmentKind, Toolpath, ToolpathSegment};
//!
//! let toolpath = Toolpath::new(vec![ToolpathSegment::new(
//!     SegmentKind::Perimeter,
//!     0,
//!     vec![[10.0, 20.0, 0.0], [30.0, 20.0, 0.0], [30.0, 40.0, 0.0]],
//!     40.0,
//! )]);
//!
//! let program = GenerationEngine::for_dialect(Dialect::Krl).generate(&toolpath);
//! assert!(program.starts_with("DEF "));
//! ```

pub mod backend;
pub mod config;
pub mod context;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod export;
pub mod hooks;
pub mod template;

pub use backend::{Backend, VendorBackend};
pub use config::{
    FanucSettings, GcodeSettings, GeneratorConfig, KrlSettings, LineEnding, RapidSettings,
};
pub use context::PointContext;
pub use dialect::Dialect;
pub use engine::{GenerationEngine, GenerationState, Program};
pub use error::{PostError, Result};
pub use export::{export_program, ExportOptions, ExportResult};
pub use hooks::{HookPoint, HookSet};
pub use template::{expand, TemplateVars};

pub use postforge_toolpath::Toolpath;
