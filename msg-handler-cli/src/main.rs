mod cli;
mod error;
mod site;

use std::{process, time::Duration};

use clap::Parser;
use msg_sender::{DispatchOptions, NotificationMessage, Settings, deliver, deliver_parsed};
use tracing::{Level, debug};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::{
    cli::{Args, Commands},
    error::{AppError, Result},
    site::load_site,
};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose, args.quiet) {
        eprintln!("Error: {e}");
    }

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let options = DispatchOptions {
        telegram_api_base: args.telegram_api_base,
        ..DispatchOptions::with_timeout(Duration::from_secs(args.timeout))
    };

    match args.command {
        Commands::Send {
            channel,
            config,
            message,
        } => {
            debug!(%channel, "Delivering with inline configuration");
            deliver(channel, &config, &message, &options).await?;
        }

        Commands::Site { path, message } => {
            let site = load_site(&path)?;
            debug!(
                site = site.id.as_deref().unwrap_or("-"),
                channel = %site.kind,
                "Delivering with site file"
            );

            let settings =
                Settings::from_value(site.kind, site.config).map_err(msg_sender::Error::from)?;
            let message = NotificationMessage::parse(&message).map_err(msg_sender::Error::from)?;
            deliver_parsed(settings, message, &options).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout stays empty.
fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
