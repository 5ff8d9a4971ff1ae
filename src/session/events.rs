use serde::Serialize;
use std::fmt;

use crate::source::Rect;

/// Notifications a search session sends to the GUI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SearchEvent {
    /// A match list build started (`true`) or finished (`false`).
    Hourglass(bool),

    /// Whether the search has a current match.
    Status(bool),

    /// Whether stepping backwards is possible.
    BackState(bool),

    /// Whether stepping forwards is possible.
    ForwardState(bool),

    /// A query to offer in the recent searches list.
    AddRecent(String),

    /// Scroll the rectangle into view, or back to the document origin.
    Scroll(Option<Rect>),
}

impl fmt::Display for SearchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |state: bool| if state { "ON" } else { "OFF" };
        match self {
            SearchEvent::Hourglass(state) => write!(f, "HOURGLASS {}", on_off(*state)),
            SearchEvent::Status(found) => {
                write!(f, "STATUS {}", if *found { "FOUND" } else { "NOTFOUND" })
            }
            SearchEvent::BackState(state) => write!(f, "BACK {}", on_off(*state)),
            SearchEvent::ForwardState(state) => write!(f, "FORWARD {}", on_off(*state)),
            SearchEvent::AddRecent(query) => write!(f, "RECENT {}", query),
            SearchEvent::Scroll(Some(rect)) => write!(
                f,
                "SCROLL {} {} {} {}",
                rect.x0, rect.y0, rect.x1, rect.y1
            ),
            SearchEvent::Scroll(None) => write!(f, "SCROLL RESET"),
        }
    }
}

/// Receiver of [`SearchEvent`]s.
///
/// Any `FnMut(&SearchEvent)` closure is an observer.
pub trait SearchObserver {
    fn notify(&mut self, event: &SearchEvent);
}

impl<F> SearchObserver for F
where
    F: FnMut(&SearchEvent),
{
    fn notify(&mut self, event: &SearchEvent) {
        self(event)
    }
}
