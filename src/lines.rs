/*!
Line reading that keeps terminator bytes and distinguishes an empty line
from end of stream.
*/

use std::io::{self, BufRead};

/// Iterator over the lines of a reader, terminator bytes included.
///
/// Unlike [`BufRead::lines`], each item keeps its trailing `\n` (or `\r\n`),
/// so writing the items back out reproduces the source bytes exactly. A line
/// with no content is an ordinary item rather than a stop signal: iteration
/// ends only when the reader itself is exhausted.
#[derive(Debug)]
pub(crate) struct TerminatedLines<R> {
    reader: R,
}

impl<R> TerminatedLines<R>
where
    R: BufRead,
{
    pub(crate) fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R> Iterator for TerminatedLines<R>
where
    R: BufRead,
{
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn lines(input: &[u8]) -> Vec<Vec<u8>> {
        TerminatedLines::new(Cursor::new(input))
            .collect::<io::Result<_>>()
            .unwrap()
    }

    #[test]
    fn terminators_stay_attached() {
        assert_eq!(
            lines(b"a\nb\r\nc\n"),
            vec![b"a\n".to_vec(), b"b\r\n".to_vec(), b"c\n".to_vec()]
        );
    }

    #[test]
    fn final_line_may_be_unterminated() {
        assert_eq!(lines(b"a\nb"), vec![b"a\n".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn empty_lines_are_items_not_exhaustion() {
        assert_eq!(
            lines(b"\n\nx\n"),
            vec![b"\n".to_vec(), b"\n".to_vec(), b"x\n".to_vec()]
        );
    }

    #[test]
    fn empty_input_is_immediately_exhausted() {
        assert!(TerminatedLines::new(Cursor::new(&b""[..])).next().is_none());
    }

    #[test]
    fn non_utf8_bytes_pass_through() {
        assert_eq!(
            lines(b"\xff\xfe\nok\n"),
            vec![b"\xff\xfe\n".to_vec(), b"ok\n".to_vec()]
        );
    }
}
