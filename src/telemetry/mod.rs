//! Diagnostics for search sessions.
//!
//! Records go through the `log` facade and env_logger writes them to
//! stderr, away from the driver's stdout. The level comes from
//! `TEXTSEARCH_LOG` and defaults to `info`.

use anyhow::Result;
use log::{Level, info};
use std::fmt;
use std::sync::Once;

/// Environment variable holding the log filter, in env_logger syntax.
pub const LOG_ENV: &str = "TEXTSEARCH_LOG";

/// Log target of records about search sessions.
pub const SESSION_TARGET: &str = "textsearch::session";

static INIT: Once = Once::new();

/// Installs the stderr logger. Later calls do nothing.
pub fn init() -> Result<()> {
    let mut result = Ok(());

    INIT.call_once(|| match setup_logging() {
        Ok(_) => {
            info!("Logging initialized from {}", LOG_ENV);
        }
        Err(e) => {
            // no logger to report through
            eprintln!("Failed to initialize logging: {}", e);
            result = Err(e);
        }
    });

    result
}

/// One line about a search: what happened, to which query, and any
/// number of `key=value` details.
///
/// ```
/// use textsearch::telemetry::SearchRecord;
///
/// let record = SearchRecord::new("Search built", "c#t")
///     .field("matches", 2)
///     .field("case_sensitive", false);
/// assert_eq!(
///     record.to_string(),
///     r#"Search built query="c#t" matches=2 case_sensitive=false"#
/// );
/// record.log(log::Level::Info);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    what: String,
    query: String,
    fields: Vec<(&'static str, String)>,
}

impl SearchRecord {
    pub fn new(what: impl Into<String>, query: &str) -> Self {
        Self {
            what: what.into(),
            query: query.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    /// Sends the record to the session log target.
    pub fn log(&self, level: Level) {
        log::log!(target: SESSION_TARGET, level, "{}", self);
    }
}

impl fmt::Display for SearchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // queries may hold spaces, so they are always quoted
        write!(f, "{} query={:?}", self.what, self.query)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "info"))
        .format_timestamp(None)
        .format_target(true)
        .format_module_path(false)
        .try_init()?;

    Ok(())
}
