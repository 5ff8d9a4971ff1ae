use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use textsearch::document::PlainText;
use textsearch::matches::MatchList;
use textsearch::pattern::is_degenerate_query;
use textsearch::source::{Document, FlatLineSource, find_occurrences};
use textsearch::{SearchEvent, SearchOptions, SearchOutcome, SearchSession};

#[derive(Parser)]
#[command(author, version, about = "Free text search over plain text documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every occurrence of a pattern in a file
    ///
    /// Offsets are bytes into the file's text after each invalid UTF-8
    /// sequence has been replaced by U+FFFD, so they match the raw file
    /// only when it is valid UTF-8.
    Find {
        /// Pattern to search for; `*` matches any run, `#` any character
        pattern: String,

        /// File to search, read as UTF-8
        file: PathBuf,

        /// Case sensitive search
        #[arg(long)]
        case_sensitive: bool,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drive a search session with commands read from stdin
    Monkey {
        /// File to load before reading commands
        file: Option<PathBuf>,

        /// Print one JSON object per output line
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct FoundMatch {
    /// Line number of the match start (1-based)
    line: usize,
    start: usize,
    end: usize,
    text: String,
}

/// One line of monkey output.
#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Reply<'a> {
    Loaded { lines: usize },
    Event(&'a SearchEvent),
    Result(&'a SearchOutcome),
    Closed,
    Error(String),
}

impl fmt::Display for Reply<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Loaded { lines } => write!(f, "LOADED {} lines", lines),
            Reply::Event(event) => write!(f, "EVENT {}", event),
            Reply::Result(outcome) => {
                let position = outcome
                    .current
                    .map_or("none".to_string(), |span| format!("{}-{}", span.start, span.end));
                write!(
                    f,
                    "RESULT matches={} current={} rebuilt={}",
                    outcome.match_count, position, outcome.rebuilt
                )
            }
            Reply::Closed => write!(f, "CLOSED"),
            Reply::Error(message) => write!(f, "ERROR {}", message),
        }
    }
}

fn main() -> Result<()> {
    textsearch::telemetry::init()?;
    let cli = Cli::parse();

    match &cli.command {
        Commands::Find {
            pattern,
            file,
            case_sensitive,
            json,
        } => {
            let doc = load(file)?;
            let found = find_all(&doc, pattern, *case_sensitive)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else if found.is_empty() {
                println!("No matches found.");
            } else {
                println!("Found {} matches:", found.len());
                for m in found {
                    println!("{}:{}: {}-{} {}", file.display(), m.line, m.start, m.end, m.text);
                }
            }
        }

        Commands::Monkey { file, json } => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_monkey(file.as_deref(), *json, stdin.lock(), &mut stdout.lock())?;
        }
    }

    Ok(())
}

/// Reads a file as text, replacing invalid UTF-8 with U+FFFD.
fn load(path: &Path) -> Result<PlainText> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file {}", path.display()))?;
    Ok(PlainText::new(String::from_utf8_lossy(&bytes).into_owned()))
}

fn find_all(doc: &PlainText, pattern: &str, case_sensitive: bool) -> Result<Vec<FoundMatch>> {
    if is_degenerate_query(pattern.as_bytes()) {
        return Ok(Vec::new());
    }

    let list = MatchList::new();
    find_occurrences(&doc.text_source(), pattern.as_bytes(), case_sensitive, &list)
        .context("Failed to search document")?;

    let text = doc.as_str().as_bytes();
    Ok(list
        .spans()
        .into_iter()
        .map(|span| FoundMatch {
            line: doc.line_of(span.start) + 1,
            start: span.start,
            end: span.end,
            text: String::from_utf8_lossy(&text[span.start..span.end]).into_owned(),
        })
        .collect())
}

/// Flags of a `SEARCH` command and the query following them.
fn parse_search(args: &str) -> (SearchOptions, &str) {
    let mut options = SearchOptions::default();
    let mut rest = args.trim_start();

    loop {
        let (word, tail) = rest.split_once(' ').unwrap_or((rest, ""));
        match word {
            "-c" => options.case_sensitive = true,
            "-a" => options.show_all = true,
            "-b" => options.forwards = false,
            _ => break,
        }
        rest = tail.trim_start();
    }

    (options, rest)
}

fn run_monkey(
    file: Option<&Path>,
    json: bool,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut doc = file.map(load).transpose()?;
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let mut session =
        SearchSession::new(move |event: &SearchEvent| sink.borrow_mut().push(event.clone()));

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        let (command, args) = line.split_once(' ').unwrap_or((line.as_str(), ""));

        match command {
            "" => continue,
            "LOAD" => match load(Path::new(args.trim())) {
                Ok(loaded) => {
                    let lines = loaded.line_count();
                    reply(out, json, &Reply::Loaded { lines })?;
                    doc = Some(loaded);
                }
                // the previous document stays loaded
                Err(e) => reply(out, json, &Reply::Error(format!("{:#}", e)))?,
            },
            "TEXT" => {
                let loaded = PlainText::new(args.replace("\\n", "\n"));
                let lines = loaded.line_count();
                reply(out, json, &Reply::Loaded { lines })?;
                doc = Some(loaded);
            }
            "SEARCH" => {
                let Some(current) = doc.as_ref() else {
                    reply(out, json, &Reply::Error("no document".to_string()))?;
                    continue;
                };
                let (options, query) = parse_search(args);
                let result = session.search_start(current, query, &options);
                write_events(out, json, &events)?;
                match result {
                    Ok(outcome) => reply(out, json, &Reply::Result(&outcome))?,
                    Err(e) => reply(out, json, &Reply::Error(e.to_string()))?,
                }
            }
            "CLOSE" => {
                session.close();
                write_events(out, json, &events)?;
                reply(out, json, &Reply::Closed)?;
            }
            "QUIT" => break,
            other => reply(out, json, &Reply::Error(format!("unknown command {}", other)))?,
        }
        out.flush()?;
    }

    Ok(())
}

fn reply(out: &mut impl Write, json: bool, line: &Reply<'_>) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, line)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn write_events(out: &mut impl Write, json: bool, events: &RefCell<Vec<SearchEvent>>) -> Result<()> {
    for event in events.borrow_mut().drain(..) {
        reply(out, json, &Reply::Event(&event))?;
    }
    Ok(())
}
