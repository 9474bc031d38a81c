//! UTF-8 path file helpers built on `cap-std` and `camino`.
//!
//! Station imports, request files and plan reports all arrive as
//! user-supplied paths. These helpers open the containing directory with
//! ambient authority once and perform the actual file operation relative
//! to it.
#![forbid(unsafe_code)]

use std::io::{self, Read, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open an existing file for reading.
///
/// # Errors
///
/// Propagates the underlying open failure.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole text file, such as a JSON plan request.
///
/// # Errors
///
/// Fails when the file cannot be opened or is not valid UTF-8.
pub fn read_utf8_file(path: &Utf8Path) -> io::Result<String> {
    let mut contents = String::new();
    open_utf8_file(path)?.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Whether `path` is a regular file rather than a directory or other entry.
///
/// # Errors
///
/// Returns [`io::ErrorKind::NotFound`] when nothing exists at `path`, and
/// propagates other metadata failures.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_parent(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Create (or truncate) `path` and write `contents`, creating missing parent
/// directories first.
///
/// # Errors
///
/// Propagates directory creation and write failures.
pub fn write_utf8_file(path: &Utf8Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_parent(path)?;
    let mut file = dir.create(name.as_str())?;
    file.write_all(contents.as_bytes())?;
    file.flush()
}

/// Ensure the directory that will hold `path` exists.
///
/// # Errors
///
/// Propagates directory creation failures.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base, relative) = split_anchor(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

fn open_parent(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `dir` into an opened anchor (filesystem root, drive prefix or the
/// working directory) and the remaining relative path.
fn split_anchor(dir: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_dir = dir.as_std_path();
    let (anchor, relative) = match std_dir.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix_text = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let anchor =
                Utf8PathBuf::from(prefix_text).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_dir
                .strip_prefix(anchor.as_std_path())
                .or_else(|_| std_dir.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip drive prefix"))?
                .to_path_buf();
            (anchor, relative)
        }
        Some(Component::RootDir) => {
            let anchor = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_dir
                .strip_prefix(anchor.as_std_path())
                .map_err(|_| io::Error::other("failed to strip filesystem root"))?
                .to_path_buf();
            (anchor, relative)
        }
        _ => (Utf8PathBuf::from("."), std_dir.to_path_buf()),
    };
    let opened = fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?;
    let relative =
        Utf8PathBuf::from_path_buf(relative).map_err(|_| io::Error::other("non-UTF-8 path"))?;
    Ok((opened, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn scratch() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        (dir, root)
    }

    #[rstest]
    fn writes_into_missing_directories(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        let target = root.join("reports/plans/plan.json");
        write_utf8_file(&target, "{\"total_cost\":71.0}").expect("write report");
        assert_eq!(
            read_utf8_file(&target).expect("read back"),
            "{\"total_cost\":71.0}"
        );
        assert!(file_is_file(&target).expect("metadata"));
    }

    #[rstest]
    fn directories_are_not_files(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        assert!(!file_is_file(&root).expect("metadata"));
        let err = file_is_file(&root.join("stations.db")).expect_err("absent file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn reading_a_missing_file_fails(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        let err = read_utf8_file(&root.join("absent.json")).expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
