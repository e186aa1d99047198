/*!
# csv-splitter

[![Docs](https://docs.rs/csv-splitter/badge.svg)](https://docs.rs/csv-splitter/)
[![Licence](https://img.shields.io/crates/l/csv-splitter)](https://github.com/csv-tools/csv-splitter/blob/main/LICENSE.txt)
[![Crates.io](https://img.shields.io/crates/v/csv-splitter)](https://crates.io/crates/csv-splitter)

Delimited exports are often too large for the tools that have to consume them: upload size caps, spreadsheet row limits, importers that time out on big batches. This crate splits such a file into multiple smaller files, each retaining the original header row, so every produced file is a valid document of the same shape as the source.

The splitter is line oriented and format agnostic. It never parses fields, quoting, or encodings: the first line is the header, every following line is a data line, and lines are moved around byte for byte. Anything line delimited with a leading schema row (CSV, TSV, pipe-separated dumps) splits the same way.

## Get Started

```rust
use std::fs;

use csv_splitter::{CsvSplitter, SplitOptions, TempDirNamer};

// Any line-delimited file with a header row.
let dir = tempfile::tempdir()?;
let source = dir.path().join("contacts.csv");
fs::write(&source, "name,email\nada,ada@example.com\ngrace,grace@example.com\n")?;

let options = SplitOptions::default().with_lines_per_file(1)?;
let splitter = CsvSplitter::new(options).with_namer(TempDirNamer::in_dir(dir.path()));

// Paths of every produced chunk, in sequence order.
let chunks = splitter.split(&source)?;
assert_eq!(chunks.len(), 2);

// Every chunk leads with the header.
let first = fs::read_to_string(&chunks[0])?;
assert_eq!(first, "name,email\nada,ada@example.com\n");
# Ok::<(), Box<dyn std::error::Error>>(())
```

## Choosing where chunks go

By default chunks land in a fresh, uniquely named directory under the system temp directory. The directory is created lazily when the first chunk is opened and is never removed by this crate, so the produced files outlive the splitter. Point [`TempDirNamer::in_dir`] at another root, or implement [`TempNamer`] yourself for full control over chunk placement:

```rust
use csv_splitter::{CsvSplitter, SplitOptions, TempDirNamer};

let splitter = CsvSplitter::new(SplitOptions::default())
    .with_namer(TempDirNamer::in_dir("/srv/exports/outbox"));
```

## Per-file overrides

One splitter often serves many files. An options hook can adjust the configured [`SplitOptions`] for each source right before its split starts:

```rust
use csv_splitter::{CsvSplitter, SplitOptions};

let splitter = CsvSplitter::default().with_options_hook(|path, options| {
    if path.ends_with("bulk.csv") {
        options.with_lines_per_file(10_000).expect("non-zero")
    } else {
        options
    }
});
```

## Method

1. The first line of the source is read once and held as the header.
2. Every following line is appended to the current chunk file. Each chunk starts with a copy of the header, and lines keep their terminator bytes, so concatenating the data lines of all chunks reproduces the data section of the source exactly.
3. After `lines_per_file` data lines the chunk is flushed and closed, and the next data line opens the next chunk.

Chunk files take the source's name with a sequence number spliced in before the extension: the first chunk of `data.csv` is `data_000000.csv`. The sequence is left-padded to six digits with a configurable character and is never truncated, so more than a million chunks simply widens the name.

Blank lines are ordinary data lines and travel with their chunk. Only true end of input stops the split, so a source holding nothing but a header produces no chunks and still succeeds.

## Errors

Splitting is all or nothing: you either get the full list of chunk paths or a [`SplitError`], never a partial list. Chunk files already written when a failure occurs are left on disk for inspection, but none of their paths are returned. Every error exposes a stable [`SplitErrorKind`] and the path it refers to, and keeps the underlying I/O error as its source. The source file is only removed when [`SplitOptions::delete_source_after_split`] is set and the split succeeded.

*/

mod lines;
mod naming;
mod options;
mod splitter;

pub use naming::{TempDirNamer, TempNamer};
pub use options::{SplitOptions, SplitOptionsError};
pub use splitter::{CsvSplitter, SplitError, SplitErrorKind};
