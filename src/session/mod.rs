//! The search session: decides between rebuilding the match list and
//! stepping through the existing one, and reports the result to the GUI.
//!
//! A session belongs to one view. It remembers the identity of the
//! document it last searched, never the document itself, so every request
//! passes the current document in.

use log::{Level, debug, warn};
use serde::Serialize;
use std::rc::Rc;

use crate::error::Result;
use crate::matches::{MatchList, MatchSpan};
use crate::pattern::is_degenerate_query;
use crate::source::{ContentId, Document, TextSource, find_occurrences};
use crate::telemetry::SearchRecord;

mod events;

pub use events::{SearchEvent, SearchObserver};

/// Per-request search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Whether letter case must match exactly.
    pub case_sensitive: bool,

    /// Direction to step when continuing an existing search.
    pub forwards: bool,

    /// Highlight every match rather than only the current one.
    pub show_all: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            forwards: true,
            show_all: false,
        }
    }
}

/// Lifecycle of a session's match list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No completed search.
    Empty,
    /// The match list was just built for the stored query.
    Built,
    /// The cursor has been stepped through an existing list.
    Stepping,
}

/// What a search request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// The match list was rebuilt rather than stepped.
    pub rebuilt: bool,

    pub match_count: usize,

    /// The match under the cursor after the request.
    pub current: Option<MatchSpan>,
}

/// Incremental free text search state for one view.
pub struct SearchSession {
    query: Option<String>,
    case_sensitive: bool,
    target: Option<ContentId>,
    matches: Rc<MatchList>,
    show_all: bool,
    state: SessionState,
    builds: usize,
    observer: Box<dyn SearchObserver>,
}

impl SearchSession {
    pub fn new(observer: impl SearchObserver + 'static) -> Self {
        Self {
            query: None,
            case_sensitive: false,
            target: None,
            matches: Rc::new(MatchList::new()),
            show_all: false,
            state: SessionState::Empty,
            builds: 0,
            observer: Box::new(observer),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The query the current match list was built for.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Identity of the document the current match list belongs to.
    pub fn target(&self) -> Option<ContentId> {
        self.target
    }

    /// Number of match lists built so far.
    pub fn builds(&self) -> usize {
        self.builds
    }

    /// Shared handle to the match list, for redraw-time queries.
    pub fn matches(&self) -> Rc<MatchList> {
        Rc::clone(&self.matches)
    }

    pub fn current(&self) -> Option<MatchSpan> {
        self.matches.current()
    }

    /// Starts a new search or steps through the current one.
    ///
    /// The match list is rebuilt, with the cursor on the first match, when
    /// the query, case sensitivity or document differ from the last build.
    /// Otherwise the cursor moves one match in the requested direction,
    /// staying put at either end. Queries without literal content find
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the match list could not be built. The session
    /// is then empty.
    pub fn search_start(
        &mut self,
        document: &dyn Document,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchOutcome> {
        self.emit(SearchEvent::AddRecent(query.to_string()));
        self.show_all = options.show_all;

        if is_degenerate_query(query.as_bytes()) {
            self.clear_results();
            self.emit(SearchEvent::Status(false));
            self.emit(SearchEvent::BackState(false));
            self.emit(SearchEvent::ForwardState(false));
            self.emit(SearchEvent::Scroll(None));
            debug!("Ignoring query without literal content: {:?}", query);

            return Ok(SearchOutcome {
                rebuilt: false,
                match_count: 0,
                current: None,
            });
        }

        let source = document.text_source();
        let rebuilt =
            if self.is_continuation(document.content_id(), query, options.case_sensitive) {
                let moved = self.matches.step(options.forwards);
                debug!(
                    "Stepped {} (moved: {}) to {:?}",
                    if options.forwards { "forwards" } else { "backwards" },
                    moved,
                    self.matches.current_index()
                );
                self.state = SessionState::Stepping;
                false
            } else {
                self.rebuild(document, &source, query, options.case_sensitive)?;
                true
            };

        self.emit(SearchEvent::Status(self.matches.current().is_some()));

        let show_all = self.show_all;
        if let Err(e) = self
            .matches
            .show_all(show_all, |span| document.create_highlight(span))
        {
            warn!("Failed to highlight search matches: {}", e);
        }

        self.emit(SearchEvent::BackState(self.matches.has_prev()));
        self.emit(SearchEvent::ForwardState(self.matches.has_next()));

        let current = self.matches.current();
        if let Some(rect) = current.and_then(|span| source.match_bounds(&span)) {
            self.emit(SearchEvent::Scroll(Some(rect)));
        }

        Ok(SearchOutcome {
            rebuilt,
            match_count: self.matches.len(),
            current,
        })
    }

    /// Ends the search, dropping all matches and their highlights.
    pub fn close(&mut self) {
        if let Some(query) = self.query.take() {
            self.emit(SearchEvent::AddRecent(query));
        }
        self.emit(SearchEvent::BackState(true));
        self.emit(SearchEvent::ForwardState(true));
        self.clear_results();
        debug!("Search session closed");
    }

    /// Highlighted part of the text run `[start, end)`, relative to
    /// `start`.
    pub fn is_match_highlighted(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        self.matches.is_highlighted(start, end)
    }

    fn is_continuation(&self, content: ContentId, query: &str, case_sensitive: bool) -> bool {
        let Some(previous) = self.query.as_deref() else {
            return false;
        };

        let same_query = if case_sensitive {
            previous == query
        } else {
            previous.eq_ignore_ascii_case(query)
        };

        same_query
            && self.case_sensitive == case_sensitive
            && self.target == Some(content)
            && !self.matches.is_empty()
    }

    fn rebuild(
        &mut self,
        document: &dyn Document,
        source: &TextSource<'_>,
        query: &str,
        case_sensitive: bool,
    ) -> Result<()> {
        self.clear_results();

        let mut stored = String::new();
        stored.try_reserve(query.len())?;
        stored.push_str(query);

        self.emit(SearchEvent::Hourglass(true));
        let walked = find_occurrences(source, query.as_bytes(), case_sensitive, &self.matches);
        self.emit(SearchEvent::Hourglass(false));

        if let Err(e) = walked {
            self.matches.free_matches();
            SearchRecord::new("Search aborted", query)
                .field("error", &e)
                .field("content", document.content_id().get())
                .log(Level::Warn);
            self.emit(SearchEvent::Status(false));
            self.emit(SearchEvent::BackState(false));
            self.emit(SearchEvent::ForwardState(false));
            return Err(e);
        }

        self.query = Some(stored);
        self.case_sensitive = case_sensitive;
        self.target = Some(document.content_id());
        self.state = SessionState::Built;
        self.builds += 1;
        self.matches.select_first();

        SearchRecord::new("Search built", query)
            .field("matches", self.matches.len())
            .field("case_sensitive", case_sensitive)
            .field("content", document.content_id().get())
            .log(Level::Info);

        Ok(())
    }

    fn clear_results(&mut self) {
        self.query = None;
        self.target = None;
        self.state = SessionState::Empty;
        self.matches.free_matches();
    }

    fn emit(&mut self, event: SearchEvent) {
        self.observer.notify(&event);
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.matches.free_matches();
    }
}
