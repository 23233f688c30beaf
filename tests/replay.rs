//! End-to-end replay runs against in-memory devices and temp-file logs.

use std::io::Write as _;
use std::time::Duration;

use embedded_can::{Frame as _, Id};
use line_replay::{
    replay_frames, replay_lines, Bitrate, CanRecord, DeviceError, Frame, FrameSink, LineSink,
    Pacer, RecordError, ReplayConfig, ReplayError,
};
use tempfile::NamedTempFile;

#[derive(Default)]
struct MemoryCan {
    bitrate: Option<Bitrate>,
    started: bool,
    stopped: bool,
    frames: Vec<(u32, Vec<u8>)>,
}

impl FrameSink for MemoryCan {
    fn configure(&mut self, bitrate: Bitrate) -> Result<(), DeviceError> {
        self.bitrate = Some(bitrate);
        Ok(())
    }

    fn start(&mut self) -> Result<(), DeviceError> {
        self.started = true;
        Ok(())
    }

    fn send(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        let id = match frame.id() {
            Id::Standard(id) => u32::from(id.as_raw()),
            Id::Extended(id) => id.as_raw(),
        };
        self.frames.push((id, frame.data().to_vec()));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DeviceError> {
        self.stopped = true;
        Ok(())
    }
}

/// Fails every frame write, as an unplugged adapter would.
struct DeadCan;

impl FrameSink for DeadCan {
    fn configure(&mut self, _bitrate: Bitrate) -> Result<(), DeviceError> {
        Ok(())
    }

    fn start(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn send(&mut self, _frame: &Frame) -> Result<(), DeviceError> {
        Err(DeviceError::Write(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "adapter gone",
        )))
    }

    fn stop(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }
}

#[derive(Default)]
struct MemoryLines {
    lines: Vec<String>,
}

impl LineSink for MemoryLines {
    fn send_line(&mut self, line: &str) -> Result<(), DeviceError> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingPacer {
    pauses: Vec<Duration>,
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, gap: Duration) {
        self.pauses.push(gap);
    }
}

fn temp_log(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write log");
    file
}

#[test]
fn replays_recorded_obd_exchange() {
    let log = temp_log("<0x7DF> R 02 01 0D\n<0x7E8> R 06 41 0D 00 00 00 00\n");
    let config = ReplayConfig::can(log.path(), "dummy");
    let mut sink = MemoryCan::default();
    let mut pacer = RecordingPacer::default();

    let sent = replay_frames(&config, &mut sink, &mut pacer).expect("replay");

    assert_eq!(sent, 2);
    assert_eq!(sink.frames[0], (2015, vec![2, 1, 13]));
    assert_eq!(sink.frames[1], (2024, vec![6, 65, 13, 0, 0, 0, 0]));
    assert_eq!(pacer.pauses, vec![Duration::from_millis(50); 2]);
}

#[test]
fn full_session_configures_starts_and_stops() {
    let log = temp_log("<0x1> R 01\n");
    let config = ReplayConfig::can(log.path(), "dummy");
    let mut sink = MemoryCan::default();
    let mut pacer = RecordingPacer::default();

    sink.configure(Bitrate::try_from(config.baud).unwrap())
        .unwrap();
    sink.start().unwrap();
    replay_frames(&config, &mut sink, &mut pacer).expect("replay");
    sink.stop().unwrap();

    assert_eq!(sink.bitrate, Some(Bitrate::Rate250kbit));
    assert!(sink.started && sink.stopped);
    assert_eq!(sink.frames.len(), 1);
}

#[test]
fn sink_writes_match_parsed_records() {
    let log = temp_log("<0x1> R 01\n<0x2> R 02\n<0x3> R 03\n");
    let config = ReplayConfig::can(log.path(), "dummy");
    let mut sink = MemoryCan::default();
    let mut pacer = RecordingPacer::default();

    let sent = replay_frames(&config, &mut sink, &mut pacer).expect("replay");

    assert_eq!(sent, 3);
    assert_eq!(sink.frames.len(), 3);
}

#[test]
fn malformed_line_stops_the_replay() {
    let log = temp_log("<0x1> R 01\nno brackets here\n<0x2> R 02\n");
    let config = ReplayConfig::can(log.path(), "dummy");
    let mut sink = MemoryCan::default();
    let mut pacer = RecordingPacer::default();

    let err = replay_frames(&config, &mut sink, &mut pacer).unwrap_err();

    assert!(matches!(
        err,
        ReplayError::Parse {
            line: 2,
            source: RecordError::MissingId,
        }
    ));
    assert_eq!(sink.frames.len(), 1);
}

#[test]
fn missing_input_file_is_reported_with_its_path() {
    let config = ReplayConfig::can("/no/such/recording.log", "dummy");
    let mut sink = MemoryCan::default();
    let mut pacer = RecordingPacer::default();

    let err = replay_frames(&config, &mut sink, &mut pacer).unwrap_err();

    match err {
        ReplayError::File { path, .. } => {
            assert_eq!(path, std::path::Path::new("/no/such/recording.log"));
        }
        other => panic!("expected a file error, got {other:?}"),
    }
    assert!(sink.frames.is_empty());
}

#[test]
fn device_failure_stops_the_replay() {
    let log = temp_log("<0x1> R 01\n<0x2> R 02\n");
    let config = ReplayConfig::can(log.path(), "dummy");
    let mut pacer = RecordingPacer::default();

    let err = replay_frames(&config, &mut DeadCan, &mut pacer).unwrap_err();

    assert!(matches!(err, ReplayError::Device(DeviceError::Write(_))));
    assert!(pacer.pauses.is_empty());
}

#[test]
fn custom_pacing_is_honored() {
    let log = temp_log("<0x1> R 01\n");
    let config = ReplayConfig::can(log.path(), "dummy").with_delay(Duration::from_millis(5));
    let mut sink = MemoryCan::default();
    let mut pacer = RecordingPacer::default();

    replay_frames(&config, &mut sink, &mut pacer).expect("replay");

    assert_eq!(pacer.pauses, vec![Duration::from_millis(5)]);
}

#[test]
fn serial_lines_go_out_verbatim_in_order() {
    let log = temp_log("AT\nAT+CGMR\n");
    let config = ReplayConfig::serial(log.path(), "dummy");
    let mut sink = MemoryLines::default();
    let mut pacer = RecordingPacer::default();

    let sent = replay_lines(&config, &mut sink, &mut pacer).expect("replay");

    assert_eq!(sent, 2);
    assert_eq!(sink.lines, ["AT", "AT+CGMR"]);
    assert_eq!(pacer.pauses, vec![Duration::from_millis(250); 2]);
}

#[test]
fn blank_lines_are_not_sent() {
    let log = temp_log("AT\n\nATZ\n");
    let config = ReplayConfig::serial(log.path(), "dummy");
    let mut sink = MemoryLines::default();
    let mut pacer = RecordingPacer::default();

    let sent = replay_lines(&config, &mut sink, &mut pacer).expect("replay");

    assert_eq!(sent, 2);
    assert_eq!(sink.lines, ["AT", "ATZ"]);
}

#[test]
fn replayed_frames_round_trip_through_the_record_format() {
    let original = CanRecord {
        id: 0x18DAF110,
        data: vec![0x10, 0x14, 0x49, 0x02],
    };
    let log = temp_log(&format!("{original}\n"));
    let config = ReplayConfig::can(log.path(), "dummy");
    let mut sink = MemoryCan::default();
    let mut pacer = RecordingPacer::default();

    replay_frames(&config, &mut sink, &mut pacer).expect("replay");

    assert_eq!(sink.frames, vec![(0x18DAF110, original.data.clone())]);
}
