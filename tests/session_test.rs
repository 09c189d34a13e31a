//! End-to-end runs against real WAV files tagged through lofty.

use std::fs;
use std::path::{Path, PathBuf};
use tagfix::apply::FileStatus;
use tagfix::cancel::CancelToken;
use tagfix::config::Config;
use tagfix::session::{DirectoryOutcome, Session, SessionOutcome};
use tagfix::tags::{LoftyLibrary, TagField, TagHandle, TagLibrary};
use tagfix::ui::{ScriptedAnswer, ScriptedPrompter};
use tempfile::TempDir;

fn write_wav(path: &Path) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..2205 {
        let sample = ((i as f32 * 0.05).sin() * 8000.0) as i16;
        writer.write_sample(sample).unwrap();
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}

fn music_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let dir = fs::canonicalize(temp_dir.path()).unwrap();
    (temp_dir, dir)
}

fn quiet_config() -> Config {
    let mut config = Config::new();
    config.show_value_summary = false;
    config
}

fn read_field(path: &Path, field: TagField) -> Option<String> {
    LoftyLibrary::new().open(path).unwrap().read(field)
}

fn global_edit_script(field: TagField, value: &str) -> Vec<ScriptedAnswer> {
    vec![
        ScriptedAnswer::text(field.menu_number().to_string()),
        ScriptedAnswer::Choice(0),
        ScriptedAnswer::text(value),
        ScriptedAnswer::Confirm(true),
    ]
}

fn completed(outcome: DirectoryOutcome) -> tagfix::apply::BatchReport {
    match outcome {
        DirectoryOutcome::Completed(report) => report,
        other => panic!("expected a completed run, got {other:?}"),
    }
}

#[test]
fn test_valid_file_next_to_text_file() {
    let (_guard, dir) = music_dir();
    write_wav(&dir.join("01 - Intro.wav"));
    fs::write(dir.join("liner notes.txt"), "thanks to everyone").unwrap();

    let config = quiet_config();
    let library = LoftyLibrary::new();
    let mut prompter = ScriptedPrompter::new(global_edit_script(TagField::Album, "Fixtures"));
    let mut session = Session::new(&config, &library, &mut prompter, CancelToken::new());

    let report = completed(session.edit_directory(&dir).unwrap());

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.applied(), 1);
    assert_eq!(report.skipped_unreadable(), 0);
    assert_eq!(
        read_field(&dir.join("01 - Intro.wav"), TagField::Album).as_deref(),
        Some("Fixtures")
    );
}

#[test]
fn test_corrupt_file_is_skipped_not_fatal() {
    let (_guard, dir) = music_dir();
    write_wav(&dir.join("a.wav"));
    fs::write(dir.join("b.flac"), b"garbage that only looks like audio").unwrap();
    write_wav(&dir.join("c.wav"));

    let config = quiet_config();
    let library = LoftyLibrary::new();
    let mut prompter =
        ScriptedPrompter::new(global_edit_script(TagField::Artist, "The Testers"));
    let mut session = Session::new(&config, &library, &mut prompter, CancelToken::new());

    let report = completed(session.edit_directory(&dir).unwrap());

    assert_eq!(report.applied(), 2);
    assert_eq!(report.skipped_unreadable(), 1);
    assert!(matches!(
        report.status_of(&dir.join("b.flac")),
        Some(FileStatus::SkippedUnreadable(_))
    ));
    for name in ["a.wav", "c.wav"] {
        assert_eq!(
            read_field(&dir.join(name), TagField::Artist).as_deref(),
            Some("The Testers")
        );
    }
    assert_eq!(
        fs::read(dir.join("b.flac")).unwrap(),
        b"garbage that only looks like audio"
    );
}

#[test]
fn test_repeating_a_global_edit_is_idempotent() {
    let (_guard, dir) = music_dir();
    write_wav(&dir.join("track.wav"));
    let config = quiet_config();
    let library = LoftyLibrary::new();

    for _ in 0..2 {
        let mut prompter = ScriptedPrompter::new(global_edit_script(TagField::Genre, "Ambient"));
        let mut session = Session::new(&config, &library, &mut prompter, CancelToken::new());
        let report = completed(session.edit_directory(&dir).unwrap());
        assert_eq!(report.applied(), 1);
        assert_eq!(
            read_field(&dir.join("track.wav"), TagField::Genre).as_deref(),
            Some("Ambient")
        );
    }

    // Only the audio file remains; no scratch copies are left behind
    let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_per_file_cancel_writes_only_entered_values() {
    let (_guard, dir) = music_dir();
    for i in 1..=5 {
        write_wav(&dir.join(format!("{i:02}.wav")));
    }
    let config = quiet_config();
    let library = LoftyLibrary::new();
    let mut prompter = ScriptedPrompter::new([
        ScriptedAnswer::text("4"),
        ScriptedAnswer::Choice(1),
        ScriptedAnswer::text("Opening"),
        ScriptedAnswer::text("Second Song"),
        ScriptedAnswer::text(":q"),
        ScriptedAnswer::Confirm(true),
    ]);
    let mut session = Session::new(&config, &library, &mut prompter, CancelToken::new());

    let report = completed(session.edit_directory(&dir).unwrap());

    assert_eq!(report.applied(), 2);
    assert_eq!(report.skipped_by_user(), 3);
    assert_eq!(
        read_field(&dir.join("01.wav"), TagField::Title).as_deref(),
        Some("Opening")
    );
    assert_eq!(
        read_field(&dir.join("02.wav"), TagField::Title).as_deref(),
        Some("Second Song")
    );
    for i in 3..=5 {
        assert_eq!(read_field(&dir.join(format!("{i:02}.wav")), TagField::Title), None);
    }
}

#[test]
fn test_interrupt_mid_per_file_keeps_earlier_commits() {
    let (_first_guard, first) = music_dir();
    let (_second_guard, second) = music_dir();
    write_wav(&first.join("done.wav"));
    for name in ["x.wav", "y.wav", "z.wav"] {
        write_wav(&second.join(name));
    }
    let untouched: Vec<Vec<u8>> = ["x.wav", "y.wav", "z.wav"]
        .iter()
        .map(|n| fs::read(second.join(n)).unwrap())
        .collect();

    let config = quiet_config();
    let library = LoftyLibrary::new();
    let mut answers = global_edit_script(TagField::Title, "Committed");
    answers.extend([
        // Main menu: another directory
        ScriptedAnswer::text(""),
        ScriptedAnswer::text(second.to_string_lossy()),
        ScriptedAnswer::text("1"),
        ScriptedAnswer::Choice(1),
        ScriptedAnswer::text("Half Done"),
        ScriptedAnswer::Interrupt,
    ]);
    let mut prompter = ScriptedPrompter::new(answers);
    let first_arg = first.to_string_lossy().to_string();
    let mut session = Session::new(&config, &library, &mut prompter, CancelToken::new());

    let outcome = session.run(Some(&first_arg)).unwrap();

    assert_eq!(outcome, SessionOutcome::Interrupted);
    assert_eq!(
        read_field(&first.join("done.wav"), TagField::Title).as_deref(),
        Some("Committed")
    );
    for (name, before) in ["x.wav", "y.wav", "z.wav"].iter().zip(&untouched) {
        assert_eq!(&fs::read(second.join(name)).unwrap(), before);
    }
}

#[test]
fn test_exit_choice_after_a_run() {
    let (_guard, dir) = music_dir();
    write_wav(&dir.join("song.wav"));
    let config = quiet_config();
    let library = LoftyLibrary::new();
    let mut answers = global_edit_script(TagField::Date, "2024");
    answers.push(ScriptedAnswer::text("0"));
    let mut prompter = ScriptedPrompter::new(answers);
    let dir_arg = dir.to_string_lossy().to_string();
    let mut session = Session::new(&config, &library, &mut prompter, CancelToken::new());

    assert_eq!(session.run(Some(&dir_arg)).unwrap(), SessionOutcome::Exited);
    assert_eq!(session.context.runs, 1);
    assert_eq!(
        read_field(&dir.join("song.wav"), TagField::Date).as_deref(),
        Some("2024")
    );
}

#[test]
fn test_cover_and_track_total_written_together() {
    let (_guard, dir) = music_dir();
    write_wav(&dir.join("01.wav"));
    write_wav(&dir.join("02.wav"));
    let image = dir.join("folder.png");
    let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
    png.extend_from_slice(&[7u8; 256]);
    fs::write(&image, &png).unwrap();

    let config = quiet_config();
    let library = LoftyLibrary::new();
    let mut prompter = ScriptedPrompter::new([
        ScriptedAnswer::text("c 7"),
        ScriptedAnswer::text(image.to_string_lossy()),
        ScriptedAnswer::Confirm(true),
        ScriptedAnswer::Choice(1),
        ScriptedAnswer::text("1/2"),
        ScriptedAnswer::text("2/2"),
        ScriptedAnswer::Confirm(true),
    ]);
    let mut session = Session::new(&config, &library, &mut prompter, CancelToken::new());

    let report = completed(session.edit_directory(&dir).unwrap());

    assert_eq!(report.applied(), 2);
    for (name, track) in [("01.wav", "1/2"), ("02.wav", "2/2")] {
        let handle = library.open(&dir.join(name)).unwrap();
        assert!(handle.has_cover(), "{name} has no cover");
        assert_eq!(handle.read(TagField::TrackNumber).as_deref(), Some(track));
    }
}
