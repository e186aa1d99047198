#![allow(missing_docs)]

use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

const LINES_PER_FILE: [usize; 3] = [5, 100, 1000];

fn main() {
    // Run registered benchmarks.
    divan::main();
}

#[divan::bench_group]
mod split {
    use std::{fs, path::PathBuf};

    use csv_splitter::{CsvSplitter, SplitOptions, TempDirNamer};
    use divan::{counter::BytesCount, Bencher};
    use tempfile::TempDir;

    use crate::LINES_PER_FILE;

    const DATA_LINES: [usize; 2] = [1_000, 10_000];

    /// Writes a delimited source file with `rows` data lines, returning the
    /// scratch dir it lives in, its path, and its size in bytes.
    fn source_file(rows: usize) -> (TempDir, PathBuf, usize) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.csv");
        let mut content = String::from("id,name,email\n");
        for i in 0..rows {
            content.push_str(&format!("{i},user{i},user{i}@example.com\n"));
        }
        fs::write(&path, &content).unwrap();
        (dir, path, content.len())
    }

    #[divan::bench(args = DATA_LINES, consts = LINES_PER_FILE)]
    fn lines_per_file<const N: usize>(bencher: Bencher<'_, '_>, rows: usize) {
        bencher
            .with_inputs(|| source_file(rows))
            .input_counter(|(_, _, bytes)| BytesCount::new(*bytes))
            .bench_values(|(dir, source, _)| {
                let options = SplitOptions::default().with_lines_per_file(N).unwrap();
                let splitter =
                    CsvSplitter::new(options).with_namer(TempDirNamer::in_dir(dir.path()));
                splitter.split(&source).unwrap();
                // Keep the scratch dir alive until the timed section ends.
                dir
            });
    }
}
