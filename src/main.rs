//! idef0 CLI
//!
//! Reads DSL statements from a file or stdin and prints the rendered
//! SVG to stdout. An optional process name selects which node's
//! decomposition to render; by default the root process is used.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use idef0::{render_with_config, RenderConfig, RenderError, Stylesheet};

#[derive(Parser)]
#[command(name = "idef0")]
#[command(about = "Render IDEF0 decomposition diagrams as SVG")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Process whose decomposition to render (default: the root process)
    process: Option<String>,

    /// Stylesheet file (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Stylesheet::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    let mut config = RenderConfig::new().with_stylesheet(stylesheet);
    if let Some(process) = &cli.process {
        config = config.with_process(process.clone());
    }

    match render_with_config(&source, config) {
        Ok(svg) => {
            println!("{}", svg);
            ExitCode::SUCCESS
        }
        Err(RenderError::Parse(errors)) => {
            for error in &errors {
                eprint!("{}", error.format(&source, &filename));
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
