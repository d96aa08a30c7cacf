use crate::config::load_config;
use crate::layout::{ViewMode, auto_layout, compute_layout};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::spec::AgentSpec;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "archboard",
    version,
    about = "Agent architecture diagram layout engine (headless)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute a layout for a specification document and dump it as JSON
    Layout {
        /// Specification JSON file, or '-' for stdin
        #[arg(short = 'i', long = "input")]
        input: PathBuf,

        /// Output file. Defaults to stdout.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// View mode
        #[arg(short = 'v', long = "view", value_enum, default_value = "architecture")]
        view: ViewArg,

        /// Config file (JSON5)
        #[arg(short = 'c', long = "configFile")]
        config: Option<PathBuf>,

        /// Ignore the document's saved positions and use computed defaults
        #[arg(long = "ignore-saved")]
        ignore_saved: bool,
    },
    /// Emit the canonical auto-layout position map for a specification
    Autolayout {
        /// Specification JSON file, or '-' for stdin
        #[arg(short = 'i', long = "input")]
        input: PathBuf,

        /// Output file. Defaults to stdout.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Config file (JSON5)
        #[arg(short = 'c', long = "configFile")]
        config: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ViewArg {
    Architecture,
    TokenEconomics,
}

impl From<ViewArg> for ViewMode {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Architecture => ViewMode::Architecture,
            ViewArg::TokenEconomics => ViewMode::TokenEconomics,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Layout {
            input,
            output,
            view,
            config,
            ignore_saved,
        } => {
            let config = load_config(config.as_deref())?;
            let spec = read_spec(&input)?;
            let saved = (!ignore_saved).then_some(&spec.node_positions);
            let layout = compute_layout(&spec, view.into(), saved, &config.layout);
            match output {
                Some(path) => write_layout_dump(&path, &layout)?,
                None => {
                    let dump = LayoutDump::from_layout(&layout);
                    serde_json::to_writer_pretty(io::stdout().lock(), &dump)?;
                    println!();
                }
            }
        }
        Command::Autolayout {
            input,
            output,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let spec = read_spec(&input)?;
            let positions = auto_layout(&spec, &config.layout);
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)?;
                    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &positions)?;
                }
                None => {
                    serde_json::to_writer_pretty(io::stdout().lock(), &positions)?;
                    println!();
                }
            }
        }
    }
    Ok(())
}

fn read_spec(path: &Path) -> Result<AgentSpec> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading specification {}", path.display()))?
    };
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing specification {}", path.display()))
}
