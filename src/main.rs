//! cannon CLI
//!
//! Entry point for the `cannon-update-values` command-line tool.

use cannon::{run, CannonError, RunOptions};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cannon-update-values")]
#[command(about = "Update Helm env values safely", version)]
struct Cli {
    /// Target environment
    #[arg(long, value_parser = ["dev", "staging", "prod"])]
    environment: String,

    /// Image tag to deploy: sha-<12hex> (dev only) or vX.Y.Z
    #[arg(long)]
    image_tag: String,

    /// Path to the Helm values file to update in place
    #[arg(long)]
    values_file: PathBuf,

    /// Report what would change without writing the file
    #[arg(long)]
    dry_run: bool,

    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(err: CannonError) -> ! {
    debug!(kind = %err.kind(), "run failed");
    eprintln!("ERROR: {}", err);
    process::exit(err.exit_code());
}

/// Parse arguments, reporting usage errors in the same form as run errors.
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            // First paragraph of clap's message, folded onto one line.
            let rendered = e.render().to_string();
            let message = rendered
                .lines()
                .map(str::trim)
                .take_while(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            eprintln!("ERROR: {}", message.trim_start_matches("error: "));
            process::exit(2);
        }
    }
}

fn main() {
    init_tracing();
    let cli = parse_args();

    let options = RunOptions {
        environment: cli.environment,
        image_tag: cli.image_tag,
        values_file: cli.values_file,
        dry_run: cli.dry_run,
    };

    let report = match run(&options) {
        Ok(report) => report,
        Err(e) => fail(e),
    };

    if cli.json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        }
    } else {
        println!("{}", report.to_human());
    }
}
