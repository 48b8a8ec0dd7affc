//! Report where a search query spent its time.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a saved query result (fetched with tracing and profiling enabled)
//! tracedoctor result.json
//!
//! # Analyze from stdin
//! curl -s "$ENDPOINT/search/?yql=...&trace.level=1&trace.profileDepth=100" | tracedoctor
//! ```

use std::io::{BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::Parser;
use tracedoctor::config::{ReportConfig, config_path};
use tracedoctor::trace::Context;
use tracedoctor::value::JsonValue;

/// Critical-path report for a traced search query
#[derive(Parser)]
#[command(name = "tracedoctor")]
#[command(about = "Find the slowest search, content node and thread in a query trace")]
#[command(after_long_help = r#"EXAMPLES:
  # Analyze a saved query result
  tracedoctor result.json

  # Read the result from stdin
  cat result.json | tracedoctor

  # Show only root profile entries, at most 20 rows per table
  printf 'profile-depth = 1\nmax-profile-rows = 20\n' > tracedoctor.toml
  tracedoctor --config tracedoctor.toml result.json
"#)]
struct Args {
    /// Path to a query result with trace (reads from stdin if omitted)
    file: Option<PathBuf>,

    /// Report configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match config_path(args.config.as_deref()) {
        Some(path) => ReportConfig::load(&path)?,
        None => ReportConfig::default(),
    };

    let input = match args.file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("Error reading {}", path.display()))?,
        _ => {
            if std::io::stdin().is_terminal() {
                bail!("No input. Usage: tracedoctor <file> | tracedoctor < input");
            }
            let mut content = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            content
        }
    };

    let doc: serde_json::Value =
        serde_json::from_str(&input).context("Input is not a valid JSON query result")?;
    log::debug!("Parsed {} bytes of query result", input.len());

    let mut stdout = BufWriter::new(std::io::stdout().lock());
    Context::with_config(JsonValue::new(&doc), config)
        .analyze(&mut stdout)
        .context("Failed to write report")?;
    stdout.flush().context("Failed to write report")?;
    Ok(())
}
