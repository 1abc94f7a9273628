use super::thread::Slot;
use super::*;
use rodio::Sink;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// These run against whatever output the machine has. Without a device every
// play fails with `NoDevice`; with one, garbage input fails to decode. Both
// paths must leave the thread serving commands.

#[test]
fn play_of_unreadable_input_fails_and_thread_keeps_running() {
    let dir = tempdir().unwrap();
    let junk = dir.path().join("junk.wav");
    fs::write(&junk, b"definitely not audio").unwrap();

    let (player, events) = AudioPlayer::spawn();

    assert!(player.play(&junk, "junk").is_err());
    assert!(player.play(Path::new("/no/such/file.wav"), "missing").is_err());
    assert!(player.stop().is_ok());

    player.shutdown();
    assert!(events.try_recv().is_err());
}

#[test]
fn requests_after_shutdown_report_disconnected() {
    let (player, _events) = AudioPlayer::spawn();
    player.shutdown();
    // Second shutdown is a no-op.
    player.shutdown();

    assert!(matches!(
        player.play(Path::new("/a.wav"), "/a.wav"),
        Err(PlayError::Disconnected)
    ));
    assert!(matches!(player.stop(), Err(PlayError::Disconnected)));
    assert!(matches!(
        player.rename("/a.wav", "/b.wav"),
        Err(PlayError::Disconnected)
    ));
}

// A detached sink with nothing queued reads as drained, which stands in for
// a sound that just ran to its end.
fn drained_sink() -> Sink {
    let (sink, _queue) = Sink::new();
    sink
}

#[test]
fn renamed_sound_finishes_under_its_new_path() {
    let mut slot = Slot::default();
    slot.start(drained_sink(), "/pads/a.wav".into());

    slot.rename("/pads/a.wav", "/pads/zap.wav".into());
    assert_eq!(slot.take_finished().as_deref(), Some("/pads/zap.wav"));
    assert_eq!(slot.take_finished(), None);
}

#[test]
fn rename_of_another_file_leaves_identity_alone() {
    let mut slot = Slot::default();
    slot.start(drained_sink(), "/pads/a.wav".into());

    slot.rename("/pads/b.wav", "/pads/zap.wav".into());
    assert_eq!(slot.take_finished().as_deref(), Some("/pads/a.wav"));
}

#[test]
fn stopped_slot_reports_nothing() {
    let mut slot = Slot::default();
    slot.start(drained_sink(), "/pads/a.wav".into());
    slot.stop();

    slot.rename("/pads/a.wav", "/pads/zap.wav".into());
    assert_eq!(slot.take_finished(), None);
}
