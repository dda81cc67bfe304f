//! Whole-file replacement via a temporary sibling and rename.
//!
//! Readers never observe a partially written results file: the new content is
//! written and synced under a hidden temporary name, then renamed over the
//! target within the same directory.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);
const MAX_ASIDE_COPIES: u32 = 1_000;

/// Replace `file_name` inside `dir` with `contents`.
pub(super) fn write_atomic(dir: &Dir, file_name: &str, contents: &[u8]) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());

    if let Err(err) = write_temp(dir, &tmp_name, contents) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    if let Err(err) = replace(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    // Directory sync is best effort.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
    Ok(())
}

/// Move `file_name` aside to `stem`, or to `stem.1`, `stem.2` and so on when
/// earlier copies exist. Earlier copies are never overwritten. Returns the
/// name used.
pub(super) fn move_aside(dir: &Dir, file_name: &str, stem: &str) -> io::Result<String> {
    for copy in 0..MAX_ASIDE_COPIES {
        let target = match copy {
            0 => stem.to_owned(),
            n => format!("{stem}.{n}"),
        };
        // Linking fails on an existing name, unlike rename.
        match dir.hard_link(file_name, dir, &target) {
            Ok(()) => {
                dir.remove_file(file_name)?;
                return Ok(target);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{MAX_ASIDE_COPIES} copies of {stem} already exist"),
    ))
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(windows)]
fn replace(dir: &Dir, from: &str, to: &str) -> io::Result<()> {
    match dir.remove_file(to) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(from, dir, to)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, from: &str, to: &str) -> io::Result<()> {
    dir.rename(from, dir, to)
}
