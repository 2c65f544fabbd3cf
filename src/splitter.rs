//! Path tokenizer: splits a path on a separator, bracket-depth aware
//!
//! A separator only splits at bracket depth 0, so a bracketed segment such
//! as `[name='a.b']` survives a `.` separator intact.

/// Lazy iterator over the segments of a path string.
///
/// Yields `(segment_text, position)` pairs in order. Cloning the splitter
/// restarts iteration from its current point.
#[derive(Debug, Clone)]
pub struct Splitter<'a> {
    path: &'a str,
    separator: &'a str,
    scan: usize,
    position: usize,
    done: bool,
}

impl<'a> Splitter<'a> {
    /// A splitter over `path` using `separator`. An empty path yields no
    /// segments at all.
    pub fn new(path: &'a str, separator: &'a str) -> Self {
        Self {
            path,
            separator,
            scan: 0,
            position: 0,
            done: path.is_empty(),
        }
    }

    /// Number of segments not yet yielded, usable mid-iteration.
    pub fn remaining(&self) -> usize {
        if self.done {
            return 0;
        }
        let mut rest = &self.path[self.scan..];
        let mut count = 1;
        while let Some(at) = find_split(rest, self.separator) {
            rest = &rest[at + self.separator.len()..];
            count += 1;
        }
        count
    }
}

impl<'a> Iterator for Splitter<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let rest = &self.path[self.scan..];
        let position = self.position;
        self.position += 1;
        match find_split(rest, self.separator) {
            Some(at) => {
                self.scan += at + self.separator.len();
                Some((&rest[..at], position))
            }
            None => {
                self.done = true;
                self.scan = self.path.len();
                Some((rest, position))
            }
        }
    }
}

/// Byte offset of the first separator occurrence at bracket depth 0.
fn find_split(rest: &str, separator: &str) -> Option<usize> {
    if separator.is_empty() {
        return None;
    }
    let bytes = rest.as_bytes();
    let sep = separator.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i + sep.len() <= bytes.len() {
        match bytes[i] {
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && &bytes[i..i + sep.len()] == sep {
            return Some(i);
        }
        i += 1;
    }
    None
}
