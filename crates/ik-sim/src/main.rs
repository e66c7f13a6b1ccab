//! Headless frame driver for the two-arm IK scene
//!
//! Stands in for the render loop and pointer handler: replays scripted
//! clicks, steps both chains once per frame and optionally streams the
//! geometry a renderer would draw.

mod cli;
mod driver;

use std::io::Write;

use clap::Parser;

use ik_core::{ConfigError, IkConfig};

use crate::cli::Args;
use crate::driver::{Driver, SimError};

fn main() -> Result<(), SimError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Logs go to stderr so --dump output on stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ik_sim=info,ik_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    tracing::info!(
        frames = config.frames,
        clicks = config.script.len(),
        "Starting IK simulation"
    );

    let mut stdout = std::io::stdout().lock();
    let dump: Option<&mut dyn Write> = if args.dump {
        Some(&mut stdout as &mut dyn Write)
    } else {
        None
    };

    let mut driver = Driver::new(&config, args.until_settled)?;
    driver.run(dump)?;
    Ok(())
}

fn load_config(args: &Args) -> Result<IkConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            IkConfig::load(path)?
        }
        None => IkConfig::default(),
    };

    if let Some(frames) = args.frames {
        config.frames = frames;
    }
    config.script.extend(args.clicks.iter().copied());
    config.validate()?;
    Ok(config)
}
