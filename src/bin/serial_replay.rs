//! Replay a recorded command file verbatim over a serial port.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use line_replay::config::{self, ReplayConfig};
use line_replay::{replay_lines, TextPort, WallClock};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Replay recorded text lines over a serial port")]
struct Args {
    /// Input file, one line per record.
    #[arg(short, long)]
    file: PathBuf,

    /// Serial port to send to.
    #[arg(short, long)]
    serial: String,

    /// Link baud rate.
    #[arg(short, long, default_value_t = config::DEFAULT_SERIAL_BAUD)]
    baud: u32,

    /// Gap between lines in milliseconds.
    #[arg(long, default_value_t = config::SERIAL_LINE_GAP.as_millis() as u64)]
    gap: u64,
}

fn run(args: Args) -> Result<()> {
    let config = ReplayConfig::serial(args.file, args.serial)
        .with_baud(args.baud)
        .with_delay(Duration::from_millis(args.gap));

    println!(
        "Reading file '{}', sending to {} @ {}",
        config.file.display(),
        config.port,
        config.baud
    );

    let mut port = TextPort::open(&config.port, config.baud)?;
    let sent = replay_lines(&config, &mut port, &mut WallClock)?;

    info!(sent, "replay finished");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run(Args::parse()) {
        eprintln!("{err:#}");
        process::exit(1);
    }
}
