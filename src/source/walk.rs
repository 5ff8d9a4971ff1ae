use crate::error::{Result, SearchError};
use crate::matches::MatchList;
use crate::pattern::find_pattern;

use super::{FlatLineSource, StructuredSource, TextRun, TextSource};

/// Appends every occurrence of `pattern` in `source` to `list`.
///
/// # Errors
///
/// Returns an error if the match list cannot grow or a structured document
/// has not been laid out. The list then holds a partial result which the
/// caller must discard.
pub fn find_occurrences(
    source: &TextSource<'_>,
    pattern: &[u8],
    case_sensitive: bool,
    list: &MatchList,
) -> Result<()> {
    match *source {
        TextSource::Structured(tree) => find_occurrences_html(tree, pattern, case_sensitive, list),
        TextSource::Flat(lines) => find_occurrences_text(lines, pattern, case_sensitive, list),
    }
}

/// Searches every text box of a structured document.
///
/// Object-replaced boxes are skipped. A match never spans two boxes, so
/// both anchors of each record are the box the match was found in.
pub fn find_occurrences_html(
    tree: &dyn StructuredSource,
    pattern: &[u8],
    case_sensitive: bool,
    list: &MatchList,
) -> Result<()> {
    if tree.root().is_none() {
        return Err(SearchError::NoLayout);
    }
    scan_runs(TextSource::Structured(tree).runs(), pattern, case_sensitive, list)
}

/// Searches every line of a flat document.
pub fn find_occurrences_text(
    lines: &dyn FlatLineSource,
    pattern: &[u8],
    case_sensitive: bool,
    list: &MatchList,
) -> Result<()> {
    scan_runs(TextSource::Flat(lines).runs(), pattern, case_sensitive, list)
}

fn scan_runs<'a>(
    runs: impl Iterator<Item = TextRun<'a>>,
    pattern: &[u8],
    case_sensitive: bool,
    list: &MatchList,
) -> Result<()> {
    for run in runs {
        let mut consumed = 0;
        while consumed < run.text.len() {
            let Some(found) = find_pattern(&run.text[consumed..], pattern, case_sensitive) else {
                break;
            };

            let start = run.offset + consumed + found.offset;
            list.add_entry(start, start + found.len, run.anchor, run.anchor)?;
            consumed += found.end();
        }
    }
    Ok(())
}
