//! # Floorplan CLI
//!
//! Command-line host for the floor-plan core.

use clap::Parser;
use floorplan_cli::{CliArgs, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing. Logs go to stderr so command output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,floorplan_cli=info,floorplan_core=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format for log shipping (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = CliConfig::from_args(&args)?;

    tracing::debug!(
        "Editor config: tolerance {}, history limit {}, stroke {}",
        config.editor.snap_tolerance,
        config.editor.history_max_length,
        config.editor.stroke_width
    );

    let output = floorplan_cli::run(&config, &args.command)?;
    println!("{output}");
    Ok(())
}
