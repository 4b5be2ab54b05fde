use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::GateError;

/// Writes every `(path, text)` pair, replacing whatever was there. All texts are
/// staged next to their destination first; destinations are only replaced once
/// every staged write has succeeded. If a replacement fails, the outputs already
/// replaced in this call are rolled back to their previous contents.
///
/// # Errors
/// Returns [`GateError::Io`] for the first path that could not be written.
pub fn write_all(files: &[(&Path, &str)]) -> Result<(), GateError> {
    for &(dest, _) in files {
        if dest.is_dir() {
            return Err(GateError::io(
                dest,
                io::Error::new(io::ErrorKind::IsADirectory, "output path is a directory"),
            ));
        }
    }

    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for &(dest, text) in files {
        match stage(dest, text) {
            Ok(tmp) => staged.push((tmp, dest)),
            Err(err) => {
                discard(&staged);
                return Err(err);
            }
        }
    }

    let mut replaced: Vec<(&Path, Option<PathBuf>)> = Vec::with_capacity(staged.len());
    for (i, (tmp, dest)) in staged.iter().enumerate() {
        match replace(tmp, dest) {
            Ok(backup) => replaced.push((*dest, backup)),
            Err(err) => {
                rollback(&replaced);
                discard(&staged[i..]);
                return Err(err);
            }
        }
        debug!(path = %dest.display(), "wrote output");
    }
    for (_, backup) in &replaced {
        if let Some(bak) = backup {
            let _ = fs::remove_file(bak);
        }
    }
    Ok(())
}

/// Overwrites a single file, creating missing parent directories.
///
/// # Errors
/// Returns [`GateError::Io`] if the directory or file cannot be written.
pub fn write_text(path: &Path, text: &str) -> Result<(), GateError> {
    create_parent(path)?;
    fs::write(path, text).map_err(|e| GateError::io(path, e))
}

fn stage(dest: &Path, text: &str) -> Result<PathBuf, GateError> {
    let tmp = staging_path(dest);
    write_text(&tmp, text).map_err(|err| match err {
        // Report the destination, not the staging file.
        GateError::Io { source, .. } => GateError::io(dest, source),
        other => other,
    })?;
    Ok(tmp)
}

fn create_parent(path: &Path) -> Result<(), GateError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| GateError::io(parent, e))?;
        }
    }
    Ok(())
}

/// Moves `tmp` over `dest`, keeping any previous `dest` as a `.bak` sibling.
fn replace(tmp: &Path, dest: &Path) -> Result<Option<PathBuf>, GateError> {
    let backup = if fs::symlink_metadata(dest).is_ok() {
        let bak = sibling(dest, ".bak");
        fs::rename(dest, &bak).map_err(|e| GateError::io(dest, e))?;
        Some(bak)
    } else {
        None
    };
    if let Err(source) = fs::rename(tmp, dest) {
        if let Some(bak) = &backup {
            let _ = fs::rename(bak, dest);
        }
        return Err(GateError::io(dest, source));
    }
    Ok(backup)
}

/// Puts back what `replace` displaced, newest first.
fn rollback(replaced: &[(&Path, Option<PathBuf>)]) {
    for (dest, backup) in replaced.iter().rev() {
        let _ = match backup {
            Some(bak) => fs::rename(bak, dest),
            None => fs::remove_file(dest),
        };
    }
}

fn staging_path(dest: &Path) -> PathBuf {
    sibling(dest, ".partial")
}

fn sibling(dest: &Path, suffix: &str) -> PathBuf {
    let mut name = dest.file_name().map_or_else(OsString::new, OsString::from);
    name.push(suffix);
    dest.with_file_name(name)
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_all_overwrites_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("out/summary.md");
        let results = dir.path().join("results.txt");
        fs::write(&results, "stale content that is longer than the new one").unwrap();

        write_all(&[(summary.as_path(), "# hi"), (results.as_path(), "a=1")]).unwrap();

        assert_eq!(fs::read_to_string(&summary).unwrap(), "# hi");
        assert_eq!(fs::read_to_string(&results).unwrap(), "a=1");
        assert!(!dir.path().join("results.txt.partial").exists());
        assert!(!dir.path().join("out/summary.md.partial").exists());
    }

    #[test]
    fn failed_stage_leaves_existing_outputs_alone() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.md");
        fs::write(&summary, "previous").unwrap();
        // A regular file where a parent directory is needed makes the second stage fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let results = blocker.join("results.txt");

        let err = write_all(&[(summary.as_path(), "new"), (results.as_path(), "a=1")]).unwrap_err();

        assert!(matches!(err, GateError::Io { .. }));
        assert_eq!(fs::read_to_string(&summary).unwrap(), "previous");
        assert!(!dir.path().join("summary.md.partial").exists());
    }

    #[test]
    fn directory_destination_leaves_other_outputs_alone() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.md");
        fs::write(&summary, "previous").unwrap();
        let results = dir.path().join("results.txt");
        fs::create_dir(&results).unwrap();

        let err = write_all(&[(summary.as_path(), "new"), (results.as_path(), "a=1")]).unwrap_err();

        assert!(matches!(err, GateError::Io { ref path, .. } if path == &results));
        assert_eq!(fs::read_to_string(&summary).unwrap(), "previous");
        assert!(results.is_dir());
        assert!(!dir.path().join("summary.md.partial").exists());
        assert!(!dir.path().join("results.txt.partial").exists());
    }

    #[test]
    fn rollback_restores_backups_and_removes_new_files() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.md");
        let results = dir.path().join("results.txt");
        fs::write(&summary, "previous").unwrap();
        let summary_tmp = staging_path(&summary);
        fs::write(&summary_tmp, "new").unwrap();
        let results_tmp = staging_path(&results);
        fs::write(&results_tmp, "a=1").unwrap();

        let summary_bak = replace(&summary_tmp, &summary).unwrap();
        let results_bak = replace(&results_tmp, &results).unwrap();
        assert_eq!(summary_bak, Some(dir.path().join("summary.md.bak")));
        assert_eq!(results_bak, None);
        assert_eq!(fs::read_to_string(&summary).unwrap(), "new");

        rollback(&[(summary.as_path(), summary_bak), (results.as_path(), results_bak)]);

        assert_eq!(fs::read_to_string(&summary).unwrap(), "previous");
        assert!(!results.exists());
        assert!(!dir.path().join("summary.md.bak").exists());
    }

    #[test]
    fn successful_write_removes_backups() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.md");
        fs::write(&summary, "previous").unwrap();

        write_all(&[(summary.as_path(), "new")]).unwrap();

        assert_eq!(fs::read_to_string(&summary).unwrap(), "new");
        assert!(!dir.path().join("summary.md.bak").exists());
    }

    #[test]
    fn staging_path_is_a_sibling() {
        assert_eq!(
            staging_path(Path::new("a/b/results.txt")),
            PathBuf::from("a/b/results.txt.partial")
        );
    }
}
