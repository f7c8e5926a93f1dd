//! postforge CLI - toolpath to robot / NC program generator
//!
//! Reads a toolpath JSON document and writes a motion program in one of the
//! supported dialects.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use postforge_post::{export_program, Dialect, ExportOptions, GeneratorConfig, LineEnding};
use postforge_toolpath::Toolpath;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "postforge")]
#[command(about = "Generate G-code, ABB RAPID, KUKA KRL and FANUC TP programs from toolpaths", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a program from a toolpath
    Generate {
        /// Input toolpath (.json)
        input: PathBuf,
        /// Output dialect (gcode, rapid, krl, fanuc or an alias)
        #[arg(short, long)]
        dialect: Option<String>,
        /// Generator configuration (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Program / module name
        #[arg(long)]
        program_name: Option<String>,
        /// Tool name
        #[arg(long)]
        tool_name: Option<String>,
        /// TCP offset along tool Z in mm (RAPID)
        #[arg(long)]
        tcp_offset_z: Option<f64>,
        /// Terminate lines with CRLF
        #[arg(long)]
        crlf: bool,
    },
    /// List supported dialects
    Dialects,
    /// Print the default configuration for a dialect as TOML
    Config {
        /// Dialect name
        #[arg(default_value = "gcode")]
        dialect: String,
    },
    /// Display information about a toolpath file
    Info {
        /// Path to the toolpath (.json)
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            input,
            dialect,
            config,
            output,
            program_name,
            tool_name,
            tcp_offset_z,
            crlf,
        } => {
            let base = match config {
                Some(path) => Some(
                    GeneratorConfig::load(&path)
                        .with_context(|| format!("failed to load config {}", path.display()))?,
                ),
                None => None,
            };
            let options = ExportOptions {
                base,
                program_name,
                tool_name,
                line_ending: crlf.then_some(LineEnding::Crlf),
                tcp_offset_z,
                ..Default::default()
            };
            generate(&input, dialect.as_deref(), &options, output.as_deref())?;
        }
        Commands::Dialects => list_dialects(),
        Commands::Config { dialect } => print_config(&dialect)?,
        Commands::Info { file } => show_info(&file)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_toolpath(path: &Path) -> Result<Toolpath> {
    Toolpath::load(path).with_context(|| format!("failed to read toolpath {}", path.display()))
}

fn generate(
    input: &Path,
    dialect: Option<&str>,
    options: &ExportOptions,
    output: Option<&Path>,
) -> Result<()> {
    let toolpath = load_toolpath(input)?;
    let dialect = match dialect {
        Some(name) => name.to_string(),
        None => options
            .base
            .as_ref()
            .map(|c| c.dialect)
            .unwrap_or_default()
            .key()
            .to_string(),
    };
    debug!(input = %input.display(), dialect = %dialect, "generating");

    let result = export_program(&toolpath, &dialect, options);
    if !result.success {
        bail!(result.error.unwrap_or_else(|| "generation failed".into()));
    }
    let content = result.content.as_deref().unwrap_or_default();

    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(
                output = %path.display(),
                lines = result.line_count,
                bytes = result.byte_size,
                "wrote program"
            );
            eprintln!(
                "Wrote {} program to {} ({} lines, {} motions, ~{:.1} s)",
                result.display_name,
                path.display(),
                result.line_count,
                result.motion_count,
                result.estimated_time_seconds
            );
        }
        None => print!("{}", content),
    }

    Ok(())
}

fn list_dialects() {
    for dialect in Dialect::all() {
        let pose = if dialect.carries_orientation() {
            "position + orientation"
        } else {
            "position"
        };
        println!(
            "{:<6} {:<10} .{:<6} {}",
            dialect.key(),
            dialect.display_name(),
            dialect.file_extension(),
            pose
        );
    }
}

fn print_config(name: &str) -> Result<()> {
    let dialect: Dialect = name.parse()?;
    let config = GeneratorConfig::for_dialect(dialect);
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn show_info(file: &Path) -> Result<()> {
    let toolpath = load_toolpath(file)?;
    let summary = toolpath.summary();

    println!("Toolpath: {}", file.display());
    println!("  Segments: {}", summary.total_segments);
    println!("  Points: {}", summary.total_points);
    println!("  Layers: {}", summary.total_layers);
    println!("  Layer height: {:.3} mm", summary.layer_height);
    println!("  Path length: {:.1} mm", toolpath.path_length());
    if let Some(offset) = summary.tool_offset_z {
        println!("  Tool offset Z: {:.3} mm", offset);
    }

    let empty = toolpath.segments.len() - toolpath.non_empty_segments().count();
    if empty > 0 {
        println!("  Empty segments: {}", empty);
    }

    let mut by_kind: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for seg in &toolpath.segments {
        let entry = by_kind.entry(seg.kind.as_str()).or_default();
        entry.0 += 1;
        entry.1 += seg.len();
    }
    if !by_kind.is_empty() {
        println!("\nSegments by kind:");
        for (kind, (segments, points)) in by_kind {
            println!("  {:<10} {} segments, {} points", kind, segments, points);
        }
    }

    Ok(())
}
