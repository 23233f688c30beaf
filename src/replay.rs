//! The replay loop: read, transform, write, pause.

use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::config::ReplayConfig;
use crate::frame::Frame;
use crate::reader::RecordReader;
use crate::record::{CanRecord, RecordError};
use crate::sink::{DeviceError, FrameSink, LineSink};

/// Why a replay stopped before the end of its input.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The input file could not be opened or read.
    #[error("input file {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A record line did not follow the log format.
    #[error("record {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: RecordError,
    },
    /// The output device failed.
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Inserts the pause between two records.
///
/// The wall clock sits behind a trait so tests can replay without
/// sleeping.
pub trait Pacer {
    fn pause(&mut self, gap: Duration);
}

/// Pacer backed by a real blocking sleep.
pub struct WallClock;

impl Pacer for WallClock {
    fn pause(&mut self, gap: Duration) {
        thread::sleep(gap);
    }
}

/// Replays every record of `config.file` as a CAN frame on `sink`.
///
/// Each record is written, echoed to stdout as `N>line`, and followed by
/// a `config.delay` pause. The first unreadable line, malformed record,
/// or device failure ends the run; whatever was already sent stays sent.
/// Returns the number of frames sent.
pub fn replay_frames<S, P>(
    config: &ReplayConfig,
    sink: &mut S,
    pacer: &mut P,
) -> Result<u64, ReplayError>
where
    S: FrameSink,
    P: Pacer,
{
    let reader = RecordReader::open(&config.file)?;
    run_frames(reader, sink, pacer, config.delay)
}

fn run_frames<R, S, P>(
    reader: RecordReader<R>,
    sink: &mut S,
    pacer: &mut P,
    delay: Duration,
) -> Result<u64, ReplayError>
where
    R: BufRead,
    S: FrameSink,
    P: Pacer,
{
    let mut count: u64 = 0;
    for line in reader {
        let line = line?;
        let record: CanRecord = line.parse().map_err(|source| ReplayError::Parse {
            line: count + 1,
            source,
        })?;
        let frame = Frame::try_from(&record).map_err(|source| ReplayError::Parse {
            line: count + 1,
            source,
        })?;

        sink.send(&frame)?;
        count += 1;
        println!("{count}>{line}");
        debug!(%frame, "frame sent");
        pacer.pause(delay);
    }

    Ok(count)
}

/// Replays `config.file` verbatim, one CRLF-terminated line per record.
///
/// Blank lines are dropped rather than sent as bare line endings.
pub fn replay_lines<S, P>(
    config: &ReplayConfig,
    sink: &mut S,
    pacer: &mut P,
) -> Result<u64, ReplayError>
where
    S: LineSink,
    P: Pacer,
{
    let reader = RecordReader::open(&config.file)?;

    let mut count: u64 = 0;
    for line in reader {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        sink.send_line(&line)?;
        count += 1;
        println!("{count}>{line}");
        pacer.pause(config.delay);
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slcan::Bitrate;
    use std::io::Cursor;

    #[derive(Default)]
    struct MemoryCan {
        frames: Vec<Frame>,
    }

    impl FrameSink for MemoryCan {
        fn configure(&mut self, _bitrate: Bitrate) -> Result<(), DeviceError> {
            Ok(())
        }

        fn start(&mut self) -> Result<(), DeviceError> {
            Ok(())
        }

        fn send(&mut self, frame: &Frame) -> Result<(), DeviceError> {
            self.frames.push(*frame);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), DeviceError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct NoPause {
        pauses: Vec<Duration>,
    }

    impl Pacer for NoPause {
        fn pause(&mut self, gap: Duration) {
            self.pauses.push(gap);
        }
    }

    #[test]
    fn malformed_line_halts_with_its_number() {
        let reader = RecordReader::from_reader(Cursor::new("<0x1> R 01\nbogus\n<0x2> R 02\n"));
        let mut sink = MemoryCan::default();
        let mut pacer = NoPause::default();

        let err = run_frames(reader, &mut sink, &mut pacer, Duration::ZERO).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Parse {
                line: 2,
                source: RecordError::MissingId,
            }
        ));
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(pacer.pauses.len(), 1);
    }

    #[test]
    fn every_record_is_paced() {
        let reader = RecordReader::from_reader(Cursor::new("<0x1> R\n<0x2> R\n"));
        let mut sink = MemoryCan::default();
        let mut pacer = NoPause::default();

        let sent = run_frames(reader, &mut sink, &mut pacer, Duration::from_millis(50)).unwrap();
        assert_eq!(sent, 2);
        assert_eq!(pacer.pauses, vec![Duration::from_millis(50); 2]);
    }
}
