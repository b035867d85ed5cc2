//! # pushframe
//!
//! Command-line front end: reads a notification as JSON and prints its APNs
//! payload or enhanced binary frame, or decodes a frame back into its fields.

#![deny(unsafe_code)]

mod commands;
mod input;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pushframe_settings::get_settings;

use crate::commands::FrameFormat;

/// Encode APNs legacy binary notifications.
#[derive(Parser, Debug)]
#[command(name = "pushframe", version, about = "Encode APNs legacy binary notifications")]
struct Cli {
    /// Log level or `EnvFilter` directive (overrides settings; `RUST_LOG` wins).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the JSON payload of a notification.
    Payload {
        /// Notification JSON file (stdin when omitted).
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the enhanced-format frame of a notification.
    Frame {
        /// Notification JSON file (stdin when omitted).
        #[arg(long)]
        input: Option<PathBuf>,

        /// Write identifier 0, as for a frame built only to be validated.
        #[arg(long)]
        for_validation: bool,

        /// Output encoding.
        #[arg(long, value_enum, default_value_t)]
        format: FrameFormat,
    },
    /// Decode a hex frame and print its fields as JSON.
    Inspect {
        /// Hex frame file (stdin when omitted).
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = get_settings();

    let level = cli.log_level.as_deref().unwrap_or(&settings.logging.level);
    pushframe_core::logging::init_subscriber(level);

    let output = match cli.command {
        Command::Payload { input } => {
            commands::payload(&commands::read_input(input.as_deref())?, settings)?
        }
        Command::Frame {
            input,
            for_validation,
            format,
        } => commands::frame(
            &commands::read_input(input.as_deref())?,
            settings,
            for_validation,
            format,
        )?,
        Command::Inspect { input } => commands::inspect(&commands::read_input(input.as_deref())?)?,
    };

    println!("{output}");
    Ok(())
}
