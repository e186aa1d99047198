use std::{env, io, path::PathBuf};

use once_cell::sync::OnceCell;
use tracing::debug;

/// Width every chunk sequence number is padded to.
const SEQUENCE_WIDTH: usize = 6;

/// Decides where chunk files are created.
///
/// The splitter derives a file name for every chunk and asks its namer for
/// the full path to create it at. Implementations choose the directory but
/// should keep `file_name` as the final component, so chunks keep their
/// derived names. The returned path must not refer to an existing file at
/// the time of the call; a taken path fails the split rather than
/// overwriting the file. The splitter creates the file before requesting
/// the next path, so implementations only need uniqueness against the
/// filesystem, not against their own history.
pub trait TempNamer {
    /// Produce the full path at which a chunk named `file_name` should be
    /// created.
    ///
    /// # Errors
    ///
    /// Will return an error if no fresh path can be handed out, for example
    /// if the backing directory cannot be created or the name is taken.
    fn unique_path(&self, file_name: &str) -> io::Result<PathBuf>;
}

/// Default [`TempNamer`]: hands out paths inside a fresh, uniquely named
/// directory under the system temp directory, or under a root of your
/// choosing.
///
/// The directory is created lazily on the first request and is never removed
/// by this crate, so chunk files outlive both the namer and the process.
/// Reusing one namer keeps handing out paths in the same directory, and a
/// name that already exists there is refused rather than overwritten.
#[derive(Debug)]
pub struct TempDirNamer {
    /// Parent under which the output directory is created.
    root: PathBuf,
    /// The output directory, created on first use.
    dir: OnceCell<PathBuf>,
}

impl TempDirNamer {
    /// Create a namer rooted at the system temp directory.
    #[must_use]
    pub fn new() -> Self {
        Self::in_dir(env::temp_dir())
    }

    /// Create a namer that places its output directory under `root`.
    ///
    /// `root` itself must already exist; only the output directory inside it
    /// is created on demand.
    #[must_use]
    pub fn in_dir(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dir: OnceCell::new(),
        }
    }
}

impl Default for TempDirNamer {
    fn default() -> Self {
        Self::new()
    }
}

impl TempNamer for TempDirNamer {
    fn unique_path(&self, file_name: &str) -> io::Result<PathBuf> {
        let dir = self.dir.get_or_try_init(|| -> io::Result<PathBuf> {
            let dir = tempfile::Builder::new()
                .prefix("csv-splitter-")
                .tempdir_in(&self.root)?
                .into_path();
            debug!(dir = %dir.display(), "created chunk output directory");
            Ok(dir)
        })?;
        let path = dir.join(file_name);
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("chunk file already exists: {}", path.display()),
            ));
        }
        Ok(path)
    }
}

/// Derives the file name for a chunk: the source file's stem, an underscore,
/// the sequence number left-padded to [`SEQUENCE_WIDTH`] with `pad`, and the
/// source extension if it has one. Sequence numbers wider than the pad width
/// are kept whole rather than truncated.
pub(crate) fn chunk_file_name(
    stem: &str,
    extension: Option<&str>,
    sequence: usize,
    pad: char,
) -> String {
    let digits = sequence.to_string();
    let mut name = String::with_capacity(stem.len() + 1 + SEQUENCE_WIDTH.max(digits.len()) + 4);
    name.push_str(stem);
    name.push('_');
    for _ in digits.len()..SEQUENCE_WIDTH {
        name.push(pad);
    }
    name.push_str(&digits);
    if let Some(extension) = extension {
        name.push('.');
        name.push_str(extension);
    }
    name
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn sequence_is_padded_to_six() {
        assert_eq!(chunk_file_name("data", Some("csv"), 0, '0'), "data_000000.csv");
        assert_eq!(chunk_file_name("data", Some("csv"), 42, '0'), "data_000042.csv");
    }

    #[test]
    fn pad_character_is_configurable() {
        assert_eq!(chunk_file_name("data", Some("csv"), 7, 'x'), "data_xxxxx7.csv");
    }

    #[test]
    fn wide_sequences_are_not_truncated() {
        assert_eq!(
            chunk_file_name("data", Some("csv"), 12_345_678, '0'),
            "data_12345678.csv"
        );
    }

    #[test]
    fn extensionless_sources_get_no_trailing_dot() {
        assert_eq!(chunk_file_name("headers", None, 3, '0'), "headers_000003");
    }

    #[test]
    fn paths_share_one_fresh_directory_under_the_root() {
        let root = TempDir::new().unwrap();
        let namer = TempDirNamer::in_dir(root.path());

        let first = namer.unique_path("a.csv").unwrap();
        let second = namer.unique_path("b.csv").unwrap();

        assert_eq!(first.parent(), second.parent());
        assert!(first.starts_with(root.path()));
        assert!(first.ends_with("a.csv"));
        assert!(second.ends_with("b.csv"));
        assert!(first.parent().unwrap().is_dir());
        assert!(!first.exists());
    }

    #[test]
    fn existing_names_are_refused() {
        let root = TempDir::new().unwrap();
        let namer = TempDirNamer::in_dir(root.path());

        let path = namer.unique_path("a.csv").unwrap();
        fs::write(&path, "taken").unwrap();

        let err = namer.unique_path("a.csv").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn directories_are_unique_per_namer() {
        let root = TempDir::new().unwrap();
        let first = TempDirNamer::in_dir(root.path()).unique_path("a.csv").unwrap();
        let second = TempDirNamer::in_dir(root.path()).unique_path("a.csv").unwrap();
        assert_ne!(first, second);
    }
}
