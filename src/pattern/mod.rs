//! Wildcard pattern matching over raw bytes.
//!
//! Patterns are literal bytes plus two wildcards: `*` matches any run of
//! bytes (including none) and `#` matches exactly one byte. Matching is
//! unanchored: the first occurrence anywhere in the text is reported.

/// Wildcard matching any run of bytes.
pub const ANY_RUN: u8 = b'*';

/// Wildcard matching a single byte.
pub const ANY_BYTE: u8 = b'#';

/// Number of wildcard positions the matcher can resume from after a
/// literal mismatch.
pub const BACKTRACK_DEPTH: usize = 16;

/// Location of a pattern occurrence within a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch {
    /// Byte offset of the first matched byte
    pub offset: usize,

    /// Number of bytes matched, never zero
    pub len: usize,
}

impl PatternMatch {
    /// Offset one past the last matched byte.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// A point the matcher can resume from when a later literal fails.
#[derive(Debug, Clone, Copy, Default)]
struct Resume {
    start: usize,
    text: usize,
    pattern: usize,
    first: bool,
}

/// Returns true if `query` has no literal content, i.e. it is empty or made
/// up solely of `*` and `#`.
///
/// Such queries are never handed to [`find_pattern`]; a session treats them
/// as producing no results.
pub fn is_degenerate_query(query: &[u8]) -> bool {
    query.iter().all(|&b| b == ANY_RUN || b == ANY_BYTE)
}

/// Finds the first occurrence of `pattern` in `text`.
///
/// # Arguments
///
/// * `text` - The bytes to search
/// * `pattern` - The pattern, possibly containing `*` and `#`
/// * `case_sensitive` - When false, ASCII letters compare case-insensitively
///
/// # Returns
///
/// The offset and length of the match, or `None` when the pattern does not
/// occur. A match consuming no bytes (a pattern of only `*`) is reported with
/// length one so callers stepping past it always make progress.
///
/// # Examples
///
/// ```
/// use textsearch::pattern::find_pattern;
///
/// let m = find_pattern(b"the cat sat", b"c#t", true).unwrap();
/// assert_eq!((m.offset, m.len), (4, 3));
/// assert!(find_pattern(b"the dog", b"cat", true).is_none());
/// ```
pub fn find_pattern(text: &[u8], pattern: &[u8], case_sensitive: bool) -> Option<PatternMatch> {
    if text.is_empty() {
        return None;
    }

    // Position 0 is a virtual `*` before the pattern, so pattern byte `i`
    // lives at position `i + 1`.
    let end = pattern.len() + 1;
    let at = |pos: usize| if pos == 0 { ANY_RUN } else { pattern[pos - 1] };
    let same = |a: u8, b: u8| {
        if case_sensitive {
            a == b
        } else {
            a.to_ascii_uppercase() == b.to_ascii_uppercase()
        }
    };

    let mut stack = [Resume::default(); BACKTRACK_DEPTH];
    let mut top = 0;
    let mut p = 0;
    let mut s = 0;
    let mut start = 0;
    let mut first = true;

    while p < end {
        let matches = if at(p) == ANY_RUN {
            // one asterisk is the same as many
            while p < end && at(p) == ANY_RUN {
                p += 1;
            }
            if p >= end {
                break;
            }

            let ch = at(p);
            if ch != ANY_BYTE {
                while s < text.len() && !same(text[s], ch) {
                    s += 1;
                }
            }

            if s < text.len() {
                if top < BACKTRACK_DEPTH {
                    stack[top] = Resume {
                        start,
                        text: s + 1,
                        pattern: p - 1,
                        first,
                    };
                    top += 1;
                }
                if first {
                    start = s;
                    first = false;
                }
                true
            } else {
                false
            }
        } else if s < text.len() {
            let ch = at(p);
            let matches = ch == ANY_BYTE || same(text[s], ch);
            if matches && first {
                start = s;
                first = false;
            }
            matches
        } else {
            false
        };

        if matches {
            p += 1;
            s += 1;
        } else {
            if top == 0 {
                return None;
            }
            top -= 1;
            let resume = stack[top];
            start = resume.start;
            s = resume.text;
            p = resume.pattern;
            first = resume.first;
        }
    }

    Some(PatternMatch {
        offset: start,
        len: (s - start).max(1),
    })
}

#[cfg(test)]
mod tests;
