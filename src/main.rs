use std::io::{Read, Write};

use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(name = "yed", about = "Convert Mermaid flowcharts into yEd GraphML")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<std::path::PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(long, short = 'o')]
    output: Option<std::path::PathBuf>,

    /// Description stored on the root graph
    #[arg(long, short = 'd', default_value = "")]
    description: String,

    /// Log more (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            buf
        }
    };

    let output = match yed::render_with_description(&input, &cli.description) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    let written = match &cli.output {
        Some(path) => std::fs::write(path, &output),
        None => std::io::stdout().write_all(output.as_bytes()),
    };
    if let Err(e) = written {
        eprintln!("ERROR: failed to write output: {e}");
        std::process::exit(1);
    }
}
