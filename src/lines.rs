use std::io::{self, BufRead};

/// Trimmed, non-blank lines of a text file, numbered from 1.
pub(crate) struct Lines<R> {
    inner: R,
    line: u64,
    buf: String,
}

impl<R> Lines<R>
where
    R: BufRead,
{
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// Next line with its number; `None` at end of input.
    pub(crate) fn next_line(&mut self) -> Option<(u64, io::Result<&str>)> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    if !self.buf.trim().is_empty() {
                        break;
                    }
                }
                Err(e) => return Some((self.line, Err(e))),
            }
        }
        Some((self.line, Ok(self.buf.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(next: Option<(u64, io::Result<&str>)>) -> Option<(u64, String)> {
        next.map(|(n, line)| (n, line.unwrap().to_string()))
    }

    #[test]
    fn blank_lines_are_skipped_but_counted() {
        let mut lines = Lines::new(&b"a\n\n  \r\n b \r\n"[..]);
        assert_eq!(owned(lines.next_line()), Some((1, String::from("a"))));
        assert_eq!(owned(lines.next_line()), Some((4, String::from("b"))));
        assert!(lines.next_line().is_none());
    }
}
