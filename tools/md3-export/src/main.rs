//! md3-export - MD3 model export tool
//!
//! Builds MD3 models from OBJ keyframes (one file or a md3.toml manifest),
//! and inspects, dumps, rewrites or exports existing ones.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hashbrown::HashMap;
use nether_md3::ReadOptions;
use std::path::{Path, PathBuf};

// Use modules from library
use md3_export::{convert, inspect, manifest};

#[derive(Parser)]
#[command(name = "md3-export")]
#[command(about = "MD3 model export tool")]
#[command(version)]
struct Cli {
    /// Fail on header counts above the format limits instead of clamping
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print header, frames, tags and surfaces of an MD3 file
    Info {
        /// Input .md3 file
        input: PathBuf,
    },

    /// Dump a decoded MD3 file as JSON
    Dump {
        /// Input .md3 file
        input: PathBuf,

        /// Output .json file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode and re-encode an MD3 file with freshly computed offsets
    Rewrite {
        /// Input .md3 file
        input: PathBuf,

        /// Output .md3 file (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build an MD3 file from OBJ keyframes sharing one topology
    Obj {
        /// Input OBJ files, one per frame
        #[arg(required = true)]
        frames: Vec<PathBuf>,

        /// Output .md3 file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Model name (default: OBJ object name or file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Texture for a material, as MATERIAL=PATH (repeatable)
        #[arg(short, long = "texture", value_name = "MATERIAL=PATH")]
        textures: Vec<String>,
    },

    /// Export one frame of an MD3 file as OBJ
    ExportObj {
        /// Input .md3 file
        input: PathBuf,

        /// Output .obj file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frame to export
        #[arg(short, long, default_value_t = 0)]
        frame: usize,
    },

    /// Build models from a manifest file
    Build {
        /// Path to md3.toml manifest
        #[arg(default_value = "md3.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = if cli.strict {
        ReadOptions::strict()
    } else {
        ReadOptions::default()
    };

    match cli.command {
        Commands::Info { input } => {
            let model = convert::read_model(&input, &options)?;
            inspect::log_model_info(&model);
        }

        Commands::Dump { input, output } => {
            let model = convert::read_model(&input, &options)?;
            let json = inspect::to_json(&model)?;
            match output {
                Some(output) => {
                    std::fs::write(&output, json)
                        .with_context(|| format!("Failed to write {:?}", output))?;
                    tracing::info!("Dumped {:?} -> {:?}", input, output);
                }
                None => println!("{json}"),
            }
        }

        Commands::Rewrite { input, output } => {
            let output = output.unwrap_or_else(|| input.clone());
            tracing::info!("Rewriting {:?} -> {:?}", input, output);
            convert::rewrite(&input, &output, &options)?;
            tracing::info!("Done!");
        }

        Commands::Obj {
            frames,
            output,
            name,
            textures,
        } => {
            let output = output.unwrap_or_else(|| frames[0].with_extension("md3"));
            let textures = parse_texture_args(&textures)?;
            tracing::info!("Converting {} OBJ frame(s) -> {:?}", frames.len(), output);
            convert::obj_to_md3(&frames, &output, name.as_deref(), &textures)?;
            tracing::info!("Done!");
        }

        Commands::ExportObj {
            input,
            output,
            frame,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("obj"));
            tracing::info!("Exporting {:?} frame {} -> {:?}", input, frame, output);
            convert::md3_to_obj(&input, &output, frame, &options)?;
            tracing::info!("Done!");
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building models from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let base_dir = manifest.parent().unwrap_or(Path::new("."));
            let written = manifest::build_all(&config, base_dir, output.as_deref())?;
            tracing::info!("Build complete! {} model(s)", written.len());
        }
    }

    Ok(())
}

/// Parse repeated `MATERIAL=PATH` arguments
fn parse_texture_args(args: &[String]) -> Result<HashMap<String, String>> {
    let mut textures = HashMap::with_capacity(args.len());
    for arg in args {
        let Some((material, path)) = arg.split_once('=') else {
            bail!("Invalid --texture {:?}, expected MATERIAL=PATH", arg);
        };
        if material.is_empty() || path.is_empty() {
            bail!("Invalid --texture {:?}, expected MATERIAL=PATH", arg);
        }
        textures.insert(material.to_string(), path.to_string());
    }
    Ok(textures)
}
