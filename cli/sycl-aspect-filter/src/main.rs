//! sycl-aspect-filter: drop file table rows whose device code needs features
//! the selected target does not have.

mod config;
mod filter;

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::FilterConfig;

const TOOL_NAME: &str = "sycl-aspect-filter";

/// Environment variable holding the log filter (e.g. `debug`).
const LOG_ENV: &str = "SYCL_ASPECT_FILTER_LOG";

#[derive(Parser)]
#[command(
    name = TOOL_NAME,
    version,
    about = "Filter a file table by the device requirements the target supports"
)]
struct Cli {
    /// Input file table
    #[arg(value_name = "input-file")]
    input: Option<PathBuf>,
    /// Output file table (default: <input stem>_filtered.<ext>)
    #[arg(short = 'o', value_name = "output-file")]
    output: Option<PathBuf>,
    /// Target device architecture to filter for
    #[arg(long)]
    target: Option<String>,
    /// Path to the device configuration file
    #[arg(long, value_name = "path")]
    device_config_file: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            process::exit(0);
        }
        Err(e) => fail(&clap_message(&e)),
    };

    init_logging();

    if let Err(e) = run(cli) {
        fail(&format!("{e:#}"));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = FilterConfig::from_args(cli.input, cli.output, cli.target, cli.device_config_file)?;
    filter::run(&config)?;
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// First line of a clap error without its `error: ` prefix.
fn clap_message(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

fn fail(message: &str) -> ! {
    eprintln!("{TOOL_NAME}: {message}");
    process::exit(1);
}
