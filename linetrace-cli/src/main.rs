//! # Linetrace
//!
//! Command-line entry point.

use clap::Parser;
use linetrace_cli::{commands, CliArgs, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "linetrace_cli=info,linetrace_render=info,linetrace_core=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match args.command {
        Command::Generate(generate) => {
            let report = commands::generate(&generate, chrono::Utc::now())?;
            tracing::info!("{}", report.status);
            println!("{}", report.path.display());
        }
        Command::Surface(surface) => {
            let metrics = commands::surface(&surface)?;
            println!("{}", commands::to_json(&metrics, true)?);
        }
        Command::Scene(scene_args) => {
            let scene = commands::scene(&scene_args)?;
            println!("{}", commands::to_json(&scene, scene_args.pretty)?);
        }
    }

    Ok(())
}
