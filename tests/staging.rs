//! Runs in its own binary: the temporary directory is redirected for the
//! whole process, so nothing else may create temp dirs concurrently.
mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use common::{run_worker, touch_images, write_cbz, FakeTranscoder};
use std::path::{Path, PathBuf};
use webpcbz::{classify, CancelToken, ConversionSettings, RunOutcome};

fn leftovers(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

fn convert(input: &Path, transcoder: FakeTranscoder, cancel: CancelToken) -> RunOutcome {
    let settings = ConversionSettings {
        archive_output: true,
        ..Default::default()
    };
    let plan = classify(&[input.to_path_buf()]);
    run_worker(plan.tasks, settings, transcoder, cancel).0
}

#[test]
fn staging_areas_are_removed_on_every_exit_path() {
    let temp = TempDir::new().unwrap();
    let scratch = temp.child("scratch");
    scratch.create_dir_all().unwrap();
    std::env::set_var("TMPDIR", scratch.path());
    assert_eq!(std::env::temp_dir(), scratch.path());

    // success
    touch_images(temp.child("chapter").path(), &["1.png", "2.png"]);
    let outcome = convert(temp.child("chapter").path(), FakeTranscoder::new(), CancelToken::new());
    assert_eq!(outcome, RunOutcome::Completed { completed: 2, total: 2 });
    write_cbz(temp.child("book.cbz").path(), &[("a/1.jpg", b"1"), ("b/2.jpg", b"2")]);
    let outcome = convert(temp.child("book.cbz").path(), FakeTranscoder::new(), CancelToken::new());
    assert_eq!(outcome, RunOutcome::Completed { completed: 2, total: 2 });
    assert!(leftovers(scratch.path()).is_empty(), "{:?}", leftovers(scratch.path()));

    // unreadable archive
    temp.child("broken.cbz").write_binary(b"not a zip").unwrap();
    convert(temp.child("broken.cbz").path(), FakeTranscoder::new(), CancelToken::new());
    assert!(leftovers(scratch.path()).is_empty(), "{:?}", leftovers(scratch.path()));

    // packaging failure
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(
            temp.path().join("gone/target.cbz"),
            temp.child("book_webp_1.cbz").path(),
        )
        .unwrap();
        convert(temp.child("book.cbz").path(), FakeTranscoder::new(), CancelToken::new());
        temp.child("book_webp_1.cbz").assert(predicates::path::missing());
        assert!(leftovers(scratch.path()).is_empty(), "{:?}", leftovers(scratch.path()));
    }

    // cancellation mid-walk
    for input in ["chapter", "book.cbz"] {
        let cancel = CancelToken::new();
        let transcoder = FakeTranscoder::new().cancelling_after(1, cancel.clone());
        let outcome = convert(temp.child(input).path(), transcoder, cancel);
        assert!(matches!(outcome, RunOutcome::Cancelled { completed: 1, .. }));
        assert!(leftovers(scratch.path()).is_empty(), "{:?}", leftovers(scratch.path()));
    }
}
