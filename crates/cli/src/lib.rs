mod graph;

pub use graph::{load_config, render_graphs, write_output};

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tsuml",
    version,
    about = "Dependency graphs for TypeScript source files",
    long_about = "tsuml parses each TypeScript or TSX file on its own, keeps its structural declarations \
                  (classes, interfaces, enums, namespaces, functions, members and top-level variables) \
                  and links them by the references found in the same file. The result is printed as one \
                  JSON graph per input file."
)]
pub struct Cli {
    /// TypeScript or TSX files to analyze
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// JSON file overriding the graph settings
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the JSON here instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,

    /// Mirror log output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = tsuml_core::logging::init_logging("cli", cli.verbose);
    graph::run(&cli)?;
    Ok(())
}
