//! variantgen CLI
//!
//! Entry point for the `variantgen` command-line tool.

use std::fs::File;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

use variantgen::pipeline::{self, PipelineConfig};

/// File log written alongside the terminal output on every run.
const LOG_FILE: &str = "variantgen.log";

#[derive(Parser)]
#[command(name = "variantgen")]
#[command(about = "Generate per-market variant configuration documents", version)]
struct Cli {
    /// Type designator selecting the product, e.g. rm1057
    #[arg(long = "type-designator", short = 't')]
    type_designator: String,

    /// Output root override (default: the layout's relative product tree)
    #[arg(long = "output", short = 'o')]
    output: Option<PathBuf>,

    /// Root directory scanned for descriptor files (default: current directory)
    #[arg(long = "tool-root", default_value = ".")]
    tool_root: PathBuf,

    /// Increase log verbosity (-v info is default, -vv debug, -vvv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    match File::create(LOG_FILE) {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config, file)),
        Err(e) => eprintln!("Failed to open {}: {}", LOG_FILE, e),
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = PipelineConfig {
        tool_root: cli.tool_root,
        type_designator: cli.type_designator,
        output_override: cli.output,
    };

    match pipeline::run(&config) {
        Ok(summary) => {
            println!("{}", summary.human_summary);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}
