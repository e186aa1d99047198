/*!
# [`CsvSplitter`]

Semantics for splitting a delimited text file into multiple smaller files,
each retaining the source's header line.
*/

use std::{
    fmt,
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use strum::IntoStaticStr;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    lines::TerminatedLines,
    naming::{chunk_file_name, TempDirNamer, TempNamer},
    SplitOptions,
};

/// The class of failure behind a [`SplitError`].
///
/// Kinds are stable identifiers. Matching on them, or on the string form
/// from [`SplitErrorKind::as_str`], is supported across versions of the
/// crate even as the underlying error details change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[non_exhaustive]
pub enum SplitErrorKind {
    /// The source file could not be opened, or reading it failed partway
    /// through.
    SourceUnreadable,
    /// A chunk file could not be named, created, or written.
    TargetUnwritable,
    /// The source file could not be removed after a successful split.
    SourceUnremovable,
}

impl SplitErrorKind {
    /// Stable machine-readable form of the kind, such as `source-unreadable`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// The error returned when a split fails.
///
/// Splitting is all or nothing: on failure no chunk paths are returned, even
/// if some chunk files had already been written. Each variant carries the
/// path involved and the underlying I/O error as its
/// [`source`](std::error::Error::source).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SplitError {
    /// The source file could not be opened or read.
    #[error("Source file `{}` could not be opened or read", .path.display())]
    SourceUnreadable {
        /// The source file that failed.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A chunk file could not be named, created, or written.
    #[error("Chunk file `{}` could not be created or written", .path.display())]
    TargetUnwritable {
        /// The chunk file that failed. If naming itself failed, this is the
        /// bare file name the namer was asked for.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The source file could not be removed after a successful split.
    #[error("Source file `{}` could not be removed after splitting", .path.display())]
    SourceUnremovable {
        /// The source file that was supposed to be removed.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl SplitError {
    /// The stable class of this failure.
    pub fn kind(&self) -> SplitErrorKind {
        match self {
            Self::SourceUnreadable { .. } => SplitErrorKind::SourceUnreadable,
            Self::TargetUnwritable { .. } => SplitErrorKind::TargetUnwritable,
            Self::SourceUnremovable { .. } => SplitErrorKind::SourceUnremovable,
        }
    }

    /// The path the failure refers to: the source file for source-side
    /// kinds, the chunk file for target-side kinds.
    pub fn path(&self) -> &Path {
        match self {
            Self::SourceUnreadable { path, .. }
            | Self::TargetUnwritable { path, .. }
            | Self::SourceUnremovable { path, .. } => path,
        }
    }
}

/// Hook that can adjust the configured options for each source file.
type OptionsHook = Box<dyn Fn(&Path, SplitOptions) -> SplitOptions + Send + Sync>;

/// Splits a delimited text file into multiple smaller files.
///
/// The first line of the source is treated as a header and replicated at the
/// top of every produced chunk. Data lines are streamed into sequentially
/// numbered chunk files, at most [`SplitOptions::lines_per_file`] per chunk,
/// with their bytes preserved exactly.
///
/// ```no_run
/// use csv_splitter::{CsvSplitter, SplitOptions};
///
/// let options = SplitOptions::default().with_lines_per_file(500)?;
/// let splitter = CsvSplitter::new(options);
///
/// // Paths of every produced chunk, in sequence order.
/// let chunks = splitter.split("exports/contacts.csv")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[allow(clippy::module_name_repetitions)]
pub struct CsvSplitter<Namer = TempDirNamer>
where
    Namer: TempNamer,
{
    /// How chunks are filled and what happens to the source afterwards.
    options: SplitOptions,
    /// Decides where chunk files are created.
    namer: Namer,
    /// Per-call override of the configured options.
    options_hook: Option<OptionsHook>,
}

impl CsvSplitter {
    /// Create a new [`CsvSplitter`] that places chunks via [`TempDirNamer`],
    /// in a fresh directory under the system temp directory.
    #[must_use]
    pub fn new(options: SplitOptions) -> Self {
        Self {
            options,
            namer: TempDirNamer::new(),
            options_hook: None,
        }
    }
}

impl Default for CsvSplitter {
    fn default() -> Self {
        Self::new(SplitOptions::default())
    }
}

impl<Namer> CsvSplitter<Namer>
where
    Namer: TempNamer,
{
    /// Retrieve a reference to the configured options.
    ///
    /// These are the options as configured, before any hook installed with
    /// [`Self::with_options_hook`] has run.
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Set a custom namer to decide where chunk files are created.
    ///
    /// ```
    /// use csv_splitter::{CsvSplitter, SplitOptions, TempDirNamer};
    ///
    /// let splitter = CsvSplitter::new(SplitOptions::default())
    ///     .with_namer(TempDirNamer::in_dir("/var/lib/exports"));
    /// ```
    #[must_use]
    pub fn with_namer<N: TempNamer>(self, namer: N) -> CsvSplitter<N> {
        CsvSplitter {
            options: self.options,
            namer,
            options_hook: self.options_hook,
        }
    }

    /// Install a hook that can adjust the options for each source file.
    ///
    /// The hook receives the source path and the configured options just
    /// before a split starts, and the options it returns are the ones used
    /// for that call. This is the seam for callers that route many files
    /// through one splitter but want per-file overrides.
    ///
    /// ```
    /// use csv_splitter::{CsvSplitter, SplitOptions};
    ///
    /// let splitter = CsvSplitter::default().with_options_hook(|path, options| {
    ///     if path.ends_with("bulk.csv") {
    ///         options.with_lines_per_file(10_000).expect("non-zero")
    ///     } else {
    ///         options
    ///     }
    /// });
    /// ```
    #[must_use]
    pub fn with_options_hook(
        mut self,
        hook: impl Fn(&Path, SplitOptions) -> SplitOptions + Send + Sync + 'static,
    ) -> Self {
        self.options_hook = Some(Box::new(hook));
        self
    }

    /// Split the source file into chunk files.
    ///
    /// The first line of the source is the header. Every following line is a
    /// data line, appended to the current chunk until it holds
    /// `lines_per_file` of them, at which point the chunk is flushed and the
    /// next data line opens the next one. Every chunk starts with a copy of
    /// the header. Returns the paths of every produced chunk in the order
    /// they were created; a source with no data lines produces no chunks.
    ///
    /// Lines keep their terminator bytes, so concatenating the data lines of
    /// every chunk in order reproduces the data section of the source byte
    /// for byte. Blank lines are data lines like any other.
    ///
    /// # Errors
    ///
    /// Will return an error if the source cannot be opened or read
    /// ([`SplitErrorKind::SourceUnreadable`]), if a chunk file cannot be
    /// named, created, or written ([`SplitErrorKind::TargetUnwritable`]), or
    /// if [`SplitOptions::delete_source_after_split`] is set and the source
    /// cannot be removed afterwards ([`SplitErrorKind::SourceUnremovable`]).
    /// Chunk files written before the failure are left on disk, but no paths
    /// are returned.
    pub fn split(&self, source: impl AsRef<Path>) -> Result<Vec<PathBuf>, SplitError> {
        let source = source.as_ref();
        let options = match &self.options_hook {
            Some(hook) => hook(source, self.options),
            None => self.options,
        };

        debug!(
            source = %source.display(),
            lines_per_file = options.lines_per_file(),
            "splitting source file"
        );

        let file = File::open(source).map_err(|err| SplitError::SourceUnreadable {
            path: source.to_path_buf(),
            source: err,
        })?;
        let (produced, data_lines) = self.write_chunks(source, options, BufReader::new(file))?;

        if options.delete_source_after_split() {
            fs::remove_file(source).map_err(|err| SplitError::SourceUnremovable {
                path: source.to_path_buf(),
                source: err,
            })?;
            debug!(source = %source.display(), "removed source file");
        }

        info!(
            source = %source.display(),
            chunks = produced.len(),
            data_lines,
            "source file split"
        );

        Ok(produced)
    }

    /// Stream the data lines of `reader` into header-prefixed chunk files,
    /// returning the chunk paths in creation order and the number of data
    /// lines written. A reader with no lines at all produces no chunks.
    fn write_chunks(
        &self,
        source: &Path,
        options: SplitOptions,
        reader: impl BufRead,
    ) -> Result<(Vec<PathBuf>, u64), SplitError> {
        let mut lines = TerminatedLines::new(reader);

        let Some(header) = lines
            .next()
            .transpose()
            .map_err(|err| SplitError::SourceUnreadable {
                path: source.to_path_buf(),
                source: err,
            })?
        else {
            return Ok((Vec::new(), 0));
        };

        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = source
            .extension()
            .map(|extension| extension.to_string_lossy().into_owned());

        let mut produced = Vec::new();
        let mut chunk: Option<ChunkFile> = None;
        let mut sequence = 0;
        let mut data_lines = 0u64;

        for line in lines {
            let line = line.map_err(|err| SplitError::SourceUnreadable {
                path: source.to_path_buf(),
                source: err,
            })?;

            let mut open = match chunk.take() {
                Some(open) => open,
                None => {
                    let name = chunk_file_name(
                        &stem,
                        extension.as_deref(),
                        sequence,
                        options.pad_filename_with(),
                    );
                    let open = ChunkFile::create(&self.namer, &name, &header)?;
                    produced.push(open.path().to_path_buf());
                    open
                }
            };

            open.write_line(&line)?;
            data_lines += 1;

            if open.is_full(options.lines_per_file()) {
                open.finish()?;
                sequence += 1;
            } else {
                chunk = Some(open);
            }
        }

        if let Some(open) = chunk {
            open.finish()?;
        }

        Ok((produced, data_lines))
    }
}

impl<Namer> fmt::Debug for CsvSplitter<Namer>
where
    Namer: TempNamer + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvSplitter")
            .field("options", &self.options)
            .field("namer", &self.namer)
            .field("options_hook", &self.options_hook.is_some())
            .finish()
    }
}

/// An open chunk file: its path, a buffered writer, and how many data lines
/// it holds so far.
struct ChunkFile {
    path: PathBuf,
    writer: BufWriter<File>,
    data_lines: usize,
}

impl ChunkFile {
    /// Ask the namer for a fresh path, create the file, and write the header.
    /// The file must not exist yet, so a namer handing out a taken path
    /// fails the split instead of truncating the file.
    fn create<Namer>(namer: &Namer, file_name: &str, header: &[u8]) -> Result<Self, SplitError>
    where
        Namer: TempNamer,
    {
        let path = namer
            .unique_path(file_name)
            .map_err(|err| SplitError::TargetUnwritable {
                path: PathBuf::from(file_name),
                source: err,
            })?;
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| SplitError::TargetUnwritable {
                path: path.clone(),
                source: err,
            })?;
        let mut chunk = Self {
            path,
            writer: BufWriter::new(file),
            data_lines: 0,
        };
        chunk.write_bytes(header)?;
        Ok(chunk)
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SplitError> {
        self.writer
            .write_all(bytes)
            .map_err(|err| SplitError::TargetUnwritable {
                path: self.path.clone(),
                source: err,
            })
    }

    /// Append one data line.
    fn write_line(&mut self, line: &[u8]) -> Result<(), SplitError> {
        self.write_bytes(line)?;
        self.data_lines += 1;
        Ok(())
    }

    fn is_full(&self, lines_per_file: usize) -> bool {
        self.data_lines >= lines_per_file
    }

    /// Flush and close the chunk. Buffered writes surface their errors here
    /// rather than disappearing when the writer is dropped.
    fn finish(mut self) -> Result<(), SplitError> {
        self.writer
            .flush()
            .map_err(|err| SplitError::TargetUnwritable {
                path: self.path.clone(),
                source: err,
            })?;
        debug!(chunk = %self.path.display(), data_lines = self.data_lines, "chunk complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn error_kinds_have_stable_identifiers() {
        assert_eq!(SplitErrorKind::SourceUnreadable.as_str(), "source-unreadable");
        assert_eq!(SplitErrorKind::TargetUnwritable.as_str(), "target-unwritable");
        assert_eq!(SplitErrorKind::SourceUnremovable.as_str(), "source-unremovable");
    }

    #[test]
    fn errors_expose_their_kind_and_path() {
        let err = SplitError::SourceUnreadable {
            path: PathBuf::from("missing.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.kind(), SplitErrorKind::SourceUnreadable);
        assert_eq!(err.path(), Path::new("missing.csv"));
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn underlying_io_errors_are_preserved_as_sources() {
        let err = SplitError::TargetUnwritable {
            path: PathBuf::from("chunk.csv"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let source = err.source().expect("io error is attached");
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn splitter_is_debuggable_with_a_hook_installed() {
        let splitter = CsvSplitter::default().with_options_hook(|_, options| options);
        let debug = format!("{splitter:?}");
        assert!(debug.contains("CsvSplitter"));
        assert!(debug.contains("options_hook: true"));
    }
}
