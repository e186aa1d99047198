use thiserror::Error;

/// Indicates there was an error with the split options.
/// The `Display` implementation will provide a human-readable error message to
/// help debug the issue that caused the error.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct SplitOptionsError(#[from] SplitOptionsErrorRepr);

/// Private error and free to change across minor version of the crate.
#[derive(Error, Debug)]
enum SplitOptionsErrorRepr {
    #[error("Lines per file must be greater than zero")]
    ZeroLinesPerFile,
}

/// Configuration for how a source file should be split.
///
/// Every option has a default, so `SplitOptions::default()` is a complete,
/// valid configuration: five data lines per chunk, sequence numbers padded
/// with `'0'`, and the source file left in place afterwards.
#[allow(clippy::module_name_repetitions)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SplitOptions {
    /// Whether the source file is removed once it has been fully split.
    delete_source_after_split: bool,
    /// How many data lines go into each chunk, not counting the header.
    lines_per_file: usize,
    /// Character used to left-pad the sequence number in chunk file names.
    pad_filename_with: char,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            delete_source_after_split: false,
            lines_per_file: 5,
            pad_filename_with: '0',
        }
    }
}

impl SplitOptions {
    /// Retrieve how many data lines go into each chunk. The header line is
    /// not counted.
    pub fn lines_per_file(&self) -> usize {
        self.lines_per_file
    }

    /// Set how many data lines go into each chunk.
    ///
    /// # Errors
    ///
    /// Will return an error if `lines_per_file` is zero, since a chunk must
    /// hold at least one data line for the split to make progress.
    pub fn with_lines_per_file(
        mut self,
        lines_per_file: usize,
    ) -> Result<Self, SplitOptionsError> {
        if lines_per_file == 0 {
            Err(SplitOptionsError(SplitOptionsErrorRepr::ZeroLinesPerFile))
        } else {
            self.lines_per_file = lines_per_file;
            Ok(self)
        }
    }

    /// Retrieve the character used to left-pad the sequence number in chunk
    /// file names.
    pub fn pad_filename_with(&self) -> char {
        self.pad_filename_with
    }

    /// Set the character used to left-pad the sequence number in chunk file
    /// names. Sequence numbers are padded to six digits, so the first chunk
    /// of `data.csv` is named `data_000000.csv` with the default `'0'`.
    ///
    /// ```
    /// use csv_splitter::SplitOptions;
    ///
    /// let options = SplitOptions::default().with_pad_filename_with('x');
    /// ```
    #[must_use]
    pub fn with_pad_filename_with(mut self, pad: char) -> Self {
        self.pad_filename_with = pad;
        self
    }

    /// Whether the source file is removed once it has been fully split.
    pub fn delete_source_after_split(&self) -> bool {
        self.delete_source_after_split
    }

    /// Specify whether the source file should be removed after a successful
    /// split. Defaults to `false`.
    ///
    /// Removal only happens once every chunk has been written and flushed.
    /// If the split fails for any reason the source is always left in place.
    ///
    /// ```
    /// use csv_splitter::SplitOptions;
    ///
    /// let options = SplitOptions::default().with_delete_source_after_split(true);
    /// ```
    #[must_use]
    pub fn with_delete_source_after_split(mut self, delete: bool) -> Self {
        self.delete_source_after_split = delete;
        self
    }
}
