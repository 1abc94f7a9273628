use super::*;
use crate::audio::PlaybackEvent;
use crate::backend::BackendError;
use crate::backend::fake::{Call, FakeBackend, Op};
use crate::playback::PlaybackState;
use crate::store::{KeyValueStore, MemoryStore};
use async_io::block_on;
use futures_util::FutureExt;

const A: &str = "/pads/a.wav";
const B: &str = "/pads/b.wav";

fn pads() -> FakeBackend {
    FakeBackend::default()
        .with_folder("/pads", &["a.wav", "b.wav", "kick.wav"])
        .with_folder("/other", &["x.wav"])
        .with_folder("/out", &[])
}

fn controller(backend: FakeBackend) -> Controller<FakeBackend> {
    Controller::new(backend, Box::new(MemoryStore::default()))
}

fn opened(backend: FakeBackend) -> Controller<FakeBackend> {
    let ctl = controller(backend);
    block_on(ctl.open_folder("/pads")).unwrap();
    ctl
}

fn visible_paths(ctl: &Controller<FakeBackend>) -> Vec<String> {
    ctl.snapshot().files.into_iter().map(|f| f.path).collect()
}

fn row(ctl: &Controller<FakeBackend>, path: &str) -> FileView {
    ctl.snapshot()
        .files
        .into_iter()
        .find(|f| f.path == path)
        .unwrap()
}

// ---------- loading ----------

#[test]
fn open_folder_lists_files_and_records_history() {
    let ctl = controller(pads());
    assert_eq!(block_on(ctl.open_folder("/pads")).unwrap(), 3);

    let snap = ctl.snapshot();
    assert_eq!(snap.folder.as_deref(), Some("/pads"));
    assert_eq!(snap.total, 3);
    assert_eq!(snap.history, vec!["/pads".to_string()]);
    assert_eq!(ctl.last_folder().as_deref(), Some("/pads"));
    assert!(ctl.backend().calls().contains(&Call::ListFavorites));
}

#[test]
fn failed_load_keeps_previous_listing() {
    let ctl = opened(pads());

    let err = block_on(ctl.open_folder("/missing")).unwrap_err();
    assert!(matches!(
        err,
        ControlError::Backend {
            action: Action::OpenFolder,
            source: BackendError::Unreadable(_)
        }
    ));

    let snap = ctl.snapshot();
    assert_eq!(snap.folder.as_deref(), Some("/pads"));
    assert_eq!(snap.total, 3);
    assert_eq!(snap.history, vec!["/pads".to_string()]);
    assert_eq!(ctl.in_flight_len(), 0);
}

#[test]
fn second_load_is_rejected_while_one_is_pending() {
    let ctl = controller(pads());
    let gate = ctl.backend().hold(Op::List);

    let mut first = Box::pin(ctl.open_folder("/pads"));
    assert!(first.as_mut().now_or_never().is_none());

    let second = ctl.open_folder("/other").now_or_never();
    assert!(matches!(
        second,
        Some(Err(ControlError::Busy {
            kind: OpKind::Load,
            ..
        }))
    ));

    gate.open();
    assert_eq!(block_on(first).unwrap(), 3);
    assert_eq!(ctl.in_flight_len(), 0);
    assert_eq!(ctl.snapshot().folder.as_deref(), Some("/pads"));
}

#[test]
fn favorites_failure_does_not_fail_the_load() {
    let backend = pads();
    backend.fail(Op::ListFavorites);
    let ctl = controller(backend);
    assert_eq!(block_on(ctl.open_folder("/pads")).unwrap(), 3);
    assert_eq!(ctl.snapshot().total, 3);
}

#[test]
fn history_is_loaded_from_store() {
    let store = MemoryStore::default();
    store
        .save_list("history", &["/old".to_string()])
        .unwrap();
    store
        .save_list("bookmarks", &["/marked".to_string()])
        .unwrap();

    let ctl = Controller::new(pads(), Box::new(store));
    let snap = ctl.snapshot();
    assert_eq!(snap.history, vec!["/old".to_string()]);
    assert!(snap.is_bookmarked("/marked"));
}

// ---------- search and view ----------

#[test]
fn query_filters_view_without_touching_listing_or_selection() {
    let ctl = opened(pads());
    ctl.dispatch_blocking(Command::ToggleSelected(A.into()));

    ctl.set_query("kick");
    assert_eq!(visible_paths(&ctl), vec!["/pads/kick.wav".to_string()]);

    let snap = ctl.snapshot();
    assert_eq!(snap.total, 3);
    assert_eq!(snap.selected, 1);
    assert_eq!(snap.query, "kick");

    ctl.set_query("");
    assert_eq!(visible_paths(&ctl).len(), 3);
    assert!(row(&ctl, A).selected);
}

#[test]
fn regex_and_glob_queries_reach_the_view() {
    let ctl = opened(pads());

    ctl.set_query("/^[ab]\\./");
    assert_eq!(visible_paths(&ctl), vec![A.to_string(), B.to_string()]);

    ctl.set_query("k*");
    assert_eq!(visible_paths(&ctl), vec!["/pads/kick.wav".to_string()]);
}

#[test]
fn select_visible_only_adds_filtered_rows() {
    let ctl = opened(pads());
    ctl.set_query("?.wav");
    ctl.select_visible();

    let snap = ctl.snapshot();
    assert_eq!(snap.selected, 2);
    ctl.set_query("");
    assert!(!row(&ctl, "/pads/kick.wav").selected);
}

#[test]
fn favorites_view_shows_only_favorites() {
    let ctl = opened(pads().with_favorites(&[B]));
    ctl.dispatch_blocking(Command::SetView(ViewMode::Favorites));
    assert_eq!(visible_paths(&ctl), vec![B.to_string()]);
    assert!(row(&ctl, B).favorite);

    ctl.dispatch_blocking(Command::SetView(ViewMode::All));
    assert_eq!(visible_paths(&ctl).len(), 3);
}

// ---------- playback ----------

#[test]
fn toggle_plays_then_stops() {
    let ctl = opened(pads());

    block_on(ctl.toggle(A)).unwrap();
    assert_eq!(ctl.snapshot().playback, PlaybackState::Playing(A.into()));
    assert!(row(&ctl, A).playing);

    block_on(ctl.toggle(A)).unwrap();
    assert_eq!(ctl.snapshot().playback, PlaybackState::Idle);

    assert_eq!(ctl.backend().count(|c| matches!(c, Call::Play(_))), 1);
    assert_eq!(ctl.backend().count(|c| *c == Call::Stop), 1);
}

#[test]
fn repeated_toggle_while_pending_sends_one_request() {
    let ctl = opened(pads());
    let gate = ctl.backend().hold(Op::Play);

    let mut first = Box::pin(ctl.toggle(A));
    assert!(first.as_mut().now_or_never().is_none());
    assert!(row(&ctl, A).pending);

    let second = ctl.toggle(A).now_or_never();
    assert!(matches!(
        second,
        Some(Err(ControlError::Busy {
            kind: OpKind::Playback,
            ..
        }))
    ));

    gate.open();
    block_on(first).unwrap();

    assert_eq!(ctl.backend().count(|c| matches!(c, Call::Play(_))), 1);
    assert_eq!(ctl.backend().count(|c| *c == Call::Stop), 0);
    assert_eq!(ctl.snapshot().playback, PlaybackState::Playing(A.into()));
}

#[test]
fn pending_play_shows_nothing_playing() {
    let ctl = opened(pads());
    block_on(ctl.toggle(A)).unwrap();

    let gate = ctl.backend().hold(Op::Play);
    let mut pending = Box::pin(ctl.toggle(B));
    assert!(pending.as_mut().now_or_never().is_none());

    let snap = ctl.snapshot();
    assert_eq!(snap.now_playing, None);
    assert!(snap.files.iter().all(|f| !f.playing));
    // Confirmed state is still the old sound.
    assert_eq!(snap.playback, PlaybackState::Playing(A.into()));

    gate.open();
    block_on(pending).unwrap();
    assert_eq!(ctl.snapshot().now_playing.as_deref(), Some(B));
}

#[test]
fn failed_play_leaves_state_unchanged() {
    let ctl = opened(pads());
    ctl.backend().fail(Op::Play);

    let err = block_on(ctl.toggle(A)).unwrap_err();
    assert!(matches!(
        err,
        ControlError::Backend {
            action: Action::Play,
            ..
        }
    ));
    assert_eq!(ctl.snapshot().playback, PlaybackState::Idle);
    assert!(!row(&ctl, A).pending);

    ctl.backend().succeed(Op::Play);
    block_on(ctl.toggle(A)).unwrap();
    assert_eq!(ctl.snapshot().playback, PlaybackState::Playing(A.into()));
}

#[test]
fn failed_stop_keeps_playing() {
    let ctl = opened(pads());
    block_on(ctl.toggle(A)).unwrap();
    ctl.backend().fail(Op::Stop);

    assert!(block_on(ctl.toggle(A)).is_err());
    assert_eq!(ctl.snapshot().playback, PlaybackState::Playing(A.into()));
}

#[test]
fn toggle_unknown_file_makes_no_request() {
    let ctl = opened(pads());
    assert!(matches!(
        block_on(ctl.toggle("/pads/nope.wav")),
        Err(ControlError::UnknownFile(_))
    ));
    assert_eq!(ctl.backend().count(|c| matches!(c, Call::Play(_))), 0);
}

#[test]
fn completion_event_returns_to_idle() {
    let ctl = opened(pads());
    block_on(ctl.toggle(A)).unwrap();

    ctl.dispatch_blocking(Command::Event(PlaybackEvent::Finished(A.into())));
    assert_eq!(ctl.snapshot().playback, PlaybackState::Idle);

    // Next toggle starts playback again instead of stopping.
    block_on(ctl.toggle(A)).unwrap();
    assert_eq!(ctl.backend().count(|c| matches!(c, Call::Play(_))), 2);
    assert_eq!(ctl.backend().count(|c| *c == Call::Stop), 0);
}

#[test]
fn stale_completion_event_is_ignored() {
    let ctl = opened(pads());
    block_on(ctl.toggle(A)).unwrap();
    block_on(ctl.toggle(B)).unwrap();

    ctl.handle_event(PlaybackEvent::Finished(A.into()));
    assert_eq!(ctl.snapshot().playback, PlaybackState::Playing(B.into()));

    block_on(ctl.toggle(B)).unwrap();
    assert_eq!(ctl.backend().count(|c| *c == Call::Stop), 1);
    assert_eq!(ctl.snapshot().playback, PlaybackState::Idle);
}

#[test]
fn late_completion_after_stop_stays_idle() {
    let ctl = opened(pads());
    block_on(ctl.toggle(A)).unwrap();
    block_on(ctl.toggle(A)).unwrap();
    assert_eq!(ctl.snapshot().playback, PlaybackState::Idle);

    ctl.handle_event(PlaybackEvent::Finished(A.into()));
    assert_eq!(ctl.snapshot().playback, PlaybackState::Idle);
    assert_eq!(ctl.backend().count(|c| *c == Call::Stop), 1);
}

#[test]
fn completion_of_old_sound_during_pending_play_does_not_clobber_new_one() {
    let ctl = opened(pads());
    block_on(ctl.toggle(A)).unwrap();

    let gate = ctl.backend().hold(Op::Play);
    let mut pending = Box::pin(ctl.toggle(B));
    assert!(pending.as_mut().now_or_never().is_none());

    ctl.handle_event(PlaybackEvent::Finished(A.into()));
    gate.open();
    block_on(pending).unwrap();
    assert_eq!(ctl.snapshot().playback, PlaybackState::Playing(B.into()));

    // A late duplicate for the old sound changes nothing either.
    ctl.handle_event(PlaybackEvent::Finished(A.into()));
    assert_eq!(ctl.snapshot().playback, PlaybackState::Playing(B.into()));
}

#[test]
fn out_of_order_play_results_keep_the_latest_request() {
    let ctl = opened(pads());
    let gate = ctl.backend().hold(Op::Play);

    let mut first = Box::pin(ctl.toggle(A));
    let mut second = Box::pin(ctl.toggle(B));
    assert!(first.as_mut().now_or_never().is_none());
    assert!(second.as_mut().now_or_never().is_none());

    gate.open();
    block_on(second).unwrap();
    block_on(first).unwrap();

    assert_eq!(ctl.snapshot().playback, PlaybackState::Playing(B.into()));
}

#[test]
fn stop_issued_after_pending_play_wins() {
    let ctl = opened(pads());
    block_on(ctl.toggle(A)).unwrap();

    let gate = ctl.backend().hold(Op::Play);
    let mut pending = Box::pin(ctl.toggle(B));
    assert!(pending.as_mut().now_or_never().is_none());

    block_on(ctl.toggle(A)).unwrap();
    gate.open();
    block_on(pending).unwrap();

    assert_eq!(ctl.snapshot().playback, PlaybackState::Idle);
}

#[test]
fn playback_survives_folder_change() {
    let ctl = opened(pads());
    block_on(ctl.toggle(A)).unwrap();
    block_on(ctl.open_folder("/other")).unwrap();

    assert_eq!(ctl.snapshot().now_playing.as_deref(), Some(A));
    // Still stoppable although no longer listed.
    block_on(ctl.toggle(A)).unwrap();
    assert_eq!(ctl.snapshot().playback, PlaybackState::Idle);
}

// ---------- rename ----------

#[test]
fn rename_moves_selection_playback_and_favorite_to_new_path() {
    let ctl = opened(pads().with_favorites(&[A]));
    ctl.dispatch_blocking(Command::ToggleSelected(A.into()));
    block_on(ctl.toggle(A)).unwrap();

    let new_path = block_on(ctl.rename(A, "zap")).unwrap();
    assert_eq!(new_path, "/pads/zap.wav");

    let snap = ctl.snapshot();
    assert!(snap.files.iter().all(|f| f.path != A));
    let renamed = row(&ctl, "/pads/zap.wav");
    assert_eq!(renamed.name, "zap.wav");
    assert!(renamed.selected);
    assert!(renamed.playing);
    assert!(renamed.favorite);
    assert_eq!(snap.playback, PlaybackState::Playing(new_path.clone()));
    assert_eq!(ctl.backend().favorites(), vec![new_path.clone()]);

    // The next toggle targets the renamed file and stops it.
    block_on(ctl.toggle(&new_path)).unwrap();
    assert_eq!(ctl.backend().count(|c| *c == Call::Stop), 1);
}

#[test]
fn rename_keeps_listing_position() {
    let ctl = opened(pads());
    block_on(ctl.rename(B, "zz.wav")).unwrap();
    assert_eq!(
        visible_paths(&ctl),
        vec![
            A.to_string(),
            "/pads/zz.wav".to_string(),
            "/pads/kick.wav".to_string()
        ]
    );
}

#[test]
fn rename_under_active_filter_targets_by_path() {
    let ctl = opened(pads());
    ctl.dispatch_blocking(Command::ToggleSelected(B.into()));
    block_on(ctl.toggle(B)).unwrap();

    ctl.set_query("b");
    assert_eq!(visible_paths(&ctl), vec![B.to_string()]);

    let new_path = block_on(ctl.rename(B, "bz.wav")).unwrap();
    assert_eq!(new_path, "/pads/bz.wav");
    assert_eq!(visible_paths(&ctl), vec![new_path.clone()]);
    assert_eq!(
        ctl.backend().calls().last(),
        Some(&Call::Rename(B.into(), "bz.wav".into()))
    );

    ctl.set_query("");
    assert_eq!(
        visible_paths(&ctl),
        vec![A.to_string(), new_path.clone(), "/pads/kick.wav".to_string()]
    );
    for untouched in [A, "/pads/kick.wav"] {
        let r = row(&ctl, untouched);
        assert!(!r.selected && !r.playing);
    }
    assert_eq!(row(&ctl, A).name, "a.wav");
    assert_eq!(row(&ctl, "/pads/kick.wav").name, "kick.wav");

    let renamed = row(&ctl, &new_path);
    assert!(renamed.selected);
    assert!(renamed.playing);
    assert_eq!(ctl.snapshot().playback, PlaybackState::Playing(new_path));
}

#[test]
fn rename_during_pending_play_retargets_the_ticket() {
    let ctl = opened(pads());
    let gate = ctl.backend().hold(Op::Play);

    let mut pending = Box::pin(ctl.toggle(A));
    assert!(pending.as_mut().now_or_never().is_none());

    block_on(ctl.rename(A, "c.wav")).unwrap();
    assert!(row(&ctl, "/pads/c.wav").pending);

    gate.open();
    block_on(pending).unwrap();
    assert_eq!(
        ctl.snapshot().playback,
        PlaybackState::Playing("/pads/c.wav".into())
    );
}

#[test]
fn failed_rename_changes_nothing() {
    let ctl = opened(pads());
    ctl.dispatch_blocking(Command::ToggleSelected(A.into()));
    ctl.backend().fail(Op::Rename);

    assert!(matches!(
        block_on(ctl.rename(A, "z.wav")),
        Err(ControlError::Backend {
            action: Action::Rename,
            ..
        })
    ));
    assert!(row(&ctl, A).selected);
    assert_eq!(ctl.in_flight_len(), 0);
}

#[test]
fn rename_of_unlisted_path_is_rejected_locally() {
    let ctl = opened(pads());
    assert!(matches!(
        block_on(ctl.rename("/else/a.wav", "b.wav")),
        Err(ControlError::UnknownFile(_))
    ));
    assert_eq!(ctl.backend().count(|c| matches!(c, Call::Rename(..))), 0);
}

#[test]
fn concurrent_rename_of_same_file_is_busy() {
    let ctl = opened(pads());
    let gate = ctl.backend().hold(Op::Rename);

    let mut first = Box::pin(ctl.rename(A, "one.wav"));
    assert!(first.as_mut().now_or_never().is_none());
    assert!(matches!(
        ctl.rename(A, "two.wav").now_or_never(),
        Some(Err(ControlError::Busy {
            kind: OpKind::Rename,
            ..
        }))
    ));

    gate.open();
    assert_eq!(block_on(first).unwrap(), "/pads/one.wav");
}

// ---------- batch rename ----------

#[test]
fn batch_rename_applies_prefix_and_suffix_before_extension() {
    let ctl = opened(pads());
    ctl.select_visible();

    let report = block_on(ctl.rename_selected("pre-", "-v2"));
    assert_eq!(
        report,
        crate::batch::BatchReport {
            renamed: 3,
            failed: 0
        }
    );

    let names: Vec<String> = ctl.snapshot().files.into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["pre-a-v2.wav", "pre-b-v2.wav", "pre-kick-v2.wav"]);
    assert_eq!(ctl.snapshot().selected, 3);
}

#[test]
fn batch_rename_counts_stale_and_rejected_items() {
    let ctl = opened(pads());
    ctl.dispatch_blocking(Command::ToggleSelected(A.into()));
    block_on(ctl.open_folder("/other")).unwrap();
    ctl.dispatch_blocking(Command::ToggleSelected("/other/x.wav".into()));

    let outcome = ctl.dispatch_blocking(Command::RenameSelected {
        prefix: "p-".into(),
        suffix: String::new(),
    });
    assert_eq!(
        outcome.report,
        Some(Report::BatchRenamed {
            renamed: 1,
            failed: 1
        })
    );
    assert_eq!(visible_paths(&ctl), vec!["/other/p-x.wav".to_string()]);

    ctl.backend().fail(Op::Rename);
    let report = block_on(ctl.rename_selected("q-", ""));
    assert_eq!(report.renamed, 0);
    assert_eq!(report.failed, 2);
}

// ---------- copy ----------

#[test]
fn copy_with_empty_selection_is_rejected_locally() {
    let ctl = opened(pads());
    assert!(matches!(
        block_on(ctl.copy_selected("/out")),
        Err(ControlError::NothingSelected)
    ));
    assert_eq!(ctl.backend().count(|c| matches!(c, Call::Copy(..))), 0);
}

#[test]
fn copy_records_target_which_can_be_reopened() {
    let ctl = opened(pads());
    ctl.dispatch_blocking(Command::ToggleSelected(B.into()));
    ctl.dispatch_blocking(Command::ToggleSelected(A.into()));

    let outcome = ctl.dispatch_blocking(Command::CopySelected {
        destination: "/out".into(),
    });
    assert_eq!(
        outcome.report,
        Some(Report::Copied {
            count: 2,
            destination: "/out".into()
        })
    );
    assert_eq!(outcome.snapshot.last_copy_target.as_deref(), Some("/out"));
    assert!(
        ctl.backend()
            .calls()
            .contains(&Call::Copy(vec![A.into(), B.into()], "/out".into()))
    );

    let outcome = ctl.dispatch_blocking(Command::OpenLastCopyTarget);
    assert_eq!(outcome.snapshot.folder.as_deref(), Some("/out"));
}

#[test]
fn failed_copy_records_no_target() {
    let ctl = opened(pads());
    ctl.dispatch_blocking(Command::ToggleSelected(A.into()));
    ctl.backend().fail(Op::Copy);

    assert!(block_on(ctl.copy_selected("/out")).is_err());
    let snap = ctl.snapshot();
    assert_eq!(snap.last_copy_target, None);
    assert_eq!(snap.selected, 1);

    // Nothing to reopen.
    let outcome = ctl.dispatch_blocking(Command::OpenLastCopyTarget);
    assert_eq!(outcome.report, None);
    assert_eq!(outcome.snapshot.folder.as_deref(), Some("/pads"));
}

// ---------- favorites and bookmarks ----------

#[test]
fn toggle_favorite_round_trips_through_backend() {
    let ctl = opened(pads());

    block_on(ctl.toggle_favorite(A)).unwrap();
    assert!(row(&ctl, A).favorite);
    assert_eq!(ctl.backend().favorites(), vec![A.to_string()]);

    block_on(ctl.toggle_favorite(A)).unwrap();
    assert!(!row(&ctl, A).favorite);
    assert!(ctl.backend().favorites().is_empty());
}

#[test]
fn failed_favorite_update_keeps_cache_consistent_with_backend() {
    let ctl = opened(pads());
    ctl.backend().fail(Op::AddFavorite);

    assert!(block_on(ctl.toggle_favorite(A)).is_err());
    assert!(!row(&ctl, A).favorite);
    assert!(ctl.backend().favorites().is_empty());
}

#[test]
fn favorite_update_on_same_file_is_busy_while_pending() {
    let ctl = opened(pads());
    let gate = ctl.backend().hold(Op::AddFavorite);

    let mut first = Box::pin(ctl.toggle_favorite(A));
    assert!(first.as_mut().now_or_never().is_none());
    assert!(matches!(
        ctl.toggle_favorite(A).now_or_never(),
        Some(Err(ControlError::Busy {
            kind: OpKind::Favorite,
            ..
        }))
    ));
    // Another file is independent.
    let mut other = Box::pin(ctl.toggle_favorite(B));
    assert!(other.as_mut().now_or_never().is_none());

    gate.open();
    block_on(other).unwrap();
    block_on(first).unwrap();

    assert_eq!(
        ctl.backend().favorites(),
        vec![A.to_string(), B.to_string()]
    );
}

#[test]
fn bookmarks_are_added_and_removed() {
    let ctl = opened(pads());
    let outcome = ctl.dispatch_blocking(Command::AddBookmark("/pads".into()));
    assert!(outcome.snapshot.is_bookmarked("/pads"));

    let outcome = ctl.dispatch_blocking(Command::RemoveBookmark("/pads".into()));
    assert!(!outcome.snapshot.is_bookmarked("/pads"));
}

// ---------- dispatch ----------

#[test]
fn dispatch_reports_load_count_and_snapshot() {
    let ctl = controller(pads());
    let outcome = ctl.dispatch_blocking(Command::OpenFolder("/pads".into()));
    assert_eq!(outcome.report, Some(Report::Loaded { count: 3 }));
    assert_eq!(outcome.snapshot.files.len(), 3);
}

#[test]
fn dispatch_propagates_errors() {
    let ctl = controller(pads());
    let err = block_on(ctl.dispatch(Command::OpenFolder("/nope".into()))).unwrap_err();
    assert!(!err.is_busy());
    assert!(err.to_string().starts_with("opening the folder failed"));
}

impl Controller<FakeBackend> {
    fn dispatch_blocking(&self, command: Command) -> Outcome {
        block_on(self.dispatch(command)).unwrap()
    }
}
