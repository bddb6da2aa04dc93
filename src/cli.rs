use crate::config::{Config, load_config};
use crate::drag::apply_drop;
use crate::ir::{BlockId, Program};
use crate::layout::{Point, calculate_program_layout};
use crate::layout_dump::{write_json, write_layout_dump};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dflayout", version, about = "Layout engine for block-based dataflow programs")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config JSON file (layout constants)
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(clap::Args, Debug)]
pub struct ProgramSource {
    /// Program file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input", conflicts_with = "demo")]
    pub input: Option<PathBuf>,

    /// Use the built-in demonstration program
    #[arg(long)]
    pub demo: bool,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the layout of a program and write it as JSON
    Layout {
        #[command(flatten)]
        source: ProgramSource,
    },
    /// Drop a block at a model-space point and write the edited program
    Drop {
        #[command(flatten)]
        source: ProgramSource,

        /// Id of the dragged block
        #[arg(long)]
        block: String,

        #[arg(long, allow_hyphen_values = true)]
        x: f32,

        #[arg(long, allow_hyphen_values = true)]
        y: f32,
    },
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug)?;
    run_with(args)
}

fn init_logging(debug: bool) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

pub fn run_with(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    match args.command {
        Command::Layout { source } => {
            let program = load_program(&source)?;
            let layout = calculate_program_layout(&program, &config.layout)?;
            write_layout_dump(source.output.as_deref(), &layout, &program, args.pretty)
        }
        Command::Drop { source, block, x, y } => {
            let program = load_program(&source)?;
            let edited = drop_block(&program, &BlockId::from(block), Point::new(x, y), &config)?;
            write_json(&edited, source.output.as_deref(), args.pretty)
        }
    }
}

fn drop_block(program: &Program, block: &BlockId, at: Point, config: &Config) -> Result<Program> {
    let layout = calculate_program_layout(program, &config.layout)?;
    match apply_drop(program, block, at, &layout, &config.layout)? {
        Some(edited) => {
            info!(block = %block, layers = edited.layers.len(), "block moved");
            Ok(edited)
        }
        None => {
            info!(block = %block, "drop left the program unchanged");
            Ok(program.clone())
        }
    }
}

fn load_program(source: &ProgramSource) -> Result<Program> {
    let program = if source.demo {
        Program::demo()
    } else {
        let text = read_input(source.input.as_deref())?;
        json5::from_str::<Program>(&text).context("Failed to parse program")?
    };
    program.validate()?;
    Ok(program)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
