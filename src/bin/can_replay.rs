//! Replay a recorded CAN log through an slcan USB adapter.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use line_replay::config::{self, ReplayConfig};
use line_replay::{replay_frames, Bitrate, FrameSink, SlcanAdapter, WallClock};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Replay recorded CAN frames through an slcan adapter")]
struct Args {
    /// Input file, one recorded frame per line.
    #[arg(short, long)]
    file: PathBuf,

    /// Serial port the CAN adapter is attached to.
    #[arg(short, long)]
    serial: String,

    /// CAN bus bitrate in bit/s.
    #[arg(short, long, default_value_t = config::DEFAULT_CAN_BITRATE)]
    baud: u32,

    /// Gap between frames in milliseconds.
    #[arg(long, default_value_t = config::CAN_FRAME_GAP.as_millis() as u64)]
    gap: u64,
}

fn run(args: Args) -> Result<()> {
    let config = ReplayConfig::can(args.file, args.serial)
        .with_baud(args.baud)
        .with_delay(Duration::from_millis(args.gap));

    println!(
        "Reading file '{}', sending to {} @ {}",
        config.file.display(),
        config.port,
        config.baud
    );

    let mut adapter = SlcanAdapter::open(&config.port)?;
    adapter.configure(Bitrate::try_from(config.baud)?)?;
    adapter.start()?;

    let sent = replay_frames(&config, &mut adapter, &mut WallClock)?;

    adapter.stop()?;
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
