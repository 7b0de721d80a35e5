//! machtool CLI - inspect tool libraries and mesh tools
//!
//! Lists and checks JSON tool libraries and revolves a tool's profile into
//! a mesh, optionally writing it out as STL.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use machtool_mesh::{export, MeshOptions};
use machtool_tooldef::ToolLibrary;

const CRATES: &[&str] = &[
    "machtool",
    "machtool_mesh",
    "machtool_tooldef",
    "machtool_geom",
];

#[derive(Parser)]
#[command(name = "machtool")]
#[command(about = "Machine tool definitions and revolved tool meshes", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tools in a library
    List {
        /// Tool library (.json)
        library: PathBuf,
    },
    /// Revolve a tool's profile into a mesh and print its statistics
    Mesh {
        /// Tool library (.json)
        library: PathBuf,
        /// Name of the tool
        tool: String,
        /// Mesh options (.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Samples around the axis (overrides the config)
        #[arg(short, long)]
        resolution: Option<u32>,
        /// Bring open profile ends to the axis
        #[arg(long)]
        close: bool,
        /// Write the mesh as binary STL
        #[arg(long)]
        stl: Option<PathBuf>,
    },
    /// Check every tool in a library
    Check {
        /// Tool library (.json)
        library: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = CRATES
        .iter()
        .map(|name| format!("{name}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn load_library(path: &Path) -> Result<ToolLibrary> {
    ToolLibrary::load(path).with_context(|| format!("reading tool library {}", path.display()))
}

fn list(path: &Path) -> Result<()> {
    let lib = load_library(path)?;
    for tool in lib.sorted() {
        let status = match tool.check_specs().and_then(|_| tool.check_geometry()) {
            Ok(()) => "ok".to_string(),
            Err(e) => e.to_string(),
        };
        println!(
            "{:<28} {:<13} {:>8.4}in  {}",
            tool.name,
            tool.kind.type_name(),
            tool.sort_key(),
            status
        );
    }
    Ok(())
}

fn mesh(
    path: &Path,
    name: &str,
    config: Option<&Path>,
    resolution: Option<u32>,
    close: bool,
    stl: Option<&Path>,
) -> Result<()> {
    let lib = load_library(path)?;
    let tool = lib
        .get(name)
        .with_context(|| format!("no tool named {name:?} in {}", path.display()))?;

    let mut options = match config {
        Some(config) => MeshOptions::load(config)?,
        None => MeshOptions::default(),
    };
    if let Some(resolution) = resolution {
        options.resolution = resolution;
    }
    options.close_ends |= close;

    let mesh = tool.mesh(&options)?;
    println!("{} ({})", tool.name, tool.kind.type_name());
    println!("  Patches: {}", mesh.patches().len());
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());
    if let Some(bbox) = mesh.bounding_box() {
        println!("  Bounds: {bbox}");
    }
    println!("  Volume: {:.6} in^3", mesh.volume());
    println!("  Surface area: {:.6} in^2", mesh.surface_area());

    if let Some(stl) = stl {
        export::save_stl(&mesh, stl)?;
        println!("Exported STL to {}", stl.display());
    }
    Ok(())
}

fn check(path: &Path) -> Result<bool> {
    let lib = load_library(path)?;
    let mut ok = true;
    for tool in lib.iter() {
        if let Err(e) = tool.check_specs().and_then(|_| tool.check_geometry()) {
            log::warn!("{} failed checks", tool.name);
            println!("{}: {e}", tool.name);
            ok = false;
        }
    }
    if ok {
        println!("{} tools ok", lib.len());
    }
    Ok(ok)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::List { library } => list(&library)?,
        Commands::Mesh {
            library,
            tool,
            config,
            resolution,
            close,
            stl,
        } => mesh(
            &library,
            &tool,
            config.as_deref(),
            resolution,
            close,
            stl.as_deref(),
        )?,
        Commands::Check { library } => {
            if !check(&library)? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
