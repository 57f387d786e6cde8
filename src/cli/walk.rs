//! `codetour walk`: drive the engine from a line-oriented command loop.
//!
//! Each input line becomes one engine event, queued through
//! [`crate::queue`] and drained before the next prompt. Publications go to a
//! [`TerminalSink`], or to a [`JsonLinesSink`] with `--json`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::address::parse_address;
use crate::discovery::discover_tours;
use crate::engine::{Direction, Engine, EngineEvent};
use crate::model::{ObservedLocation, Position, RepositoryIdentity, Selection, ViewContext};
use crate::publish::{ContextSink, JsonLinesSink};
use crate::queue::{EventReceiver, EventSender, channel};

use super::format::format_actions;

const WALK_HELP: &str = "\
Commands:
  start [N]                  start the only tour, or tour N
  select [N]                 pick tour N from the listing (no N cancels)
  next | prev                move through the active tour
  complete                   finish the active tour
  open <address>             follow a step address
  file <path> [L[:C][-L[:C]]]  report the viewer on a file, cursor, or range
  dir <path>                 report the viewer on a directory
  refresh                    rediscover tours
  context                    print the latest view context
  help | quit";

/// One parsed line of walk input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum WalkCommand {
    Start(Option<String>),
    Select(Option<String>),
    Next,
    Prev,
    Complete,
    Open(String),
    File {
        path: String,
        selection: Option<Selection>,
    },
    Dir(String),
    Refresh,
    Context,
    Help,
    Quit,
}

impl WalkCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub(super) fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let arg = words.next().map(String::from);

        let command = match verb {
            "start" => Self::Start(arg),
            "select" => Self::Select(arg),
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "complete" => Self::Complete,
            "open" => Self::Open(arg.ok_or("usage: open <address>")?),
            "file" => {
                let path = arg.ok_or("usage: file <path> [line[:char][-line[:char]]]")?;
                let selection = match words.next() {
                    Some(range) => Some(
                        parse_range(range).ok_or_else(|| format!("invalid range '{range}'"))?,
                    ),
                    None => None,
                };
                Self::File { path, selection }
            }
            "dir" => Self::Dir(arg.ok_or("usage: dir <path>")?),
            "refresh" => Self::Refresh,
            "context" => Self::Context,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{other}' (try help)")),
        };
        Ok(Some(command))
    }
}

/// `5`, `5:3`, or `3-7:2` style cursor and range input.
fn parse_range(input: &str) -> Option<Selection> {
    match input.split_once('-') {
        Some((start, end)) => Some(Selection {
            start: parse_position(start)?,
            end: parse_position(end)?,
        }),
        None => parse_position(input).map(Selection::cursor),
    }
}

fn parse_position(input: &str) -> Option<Position> {
    let (line, character) = match input.split_once(':') {
        Some((line, character)) => (line, character.parse().ok()?),
        None => (input, 0),
    };
    Some(Position {
        line: line.parse().ok()?,
        character,
    })
}

/// Human-readable publications: each panel body followed by the actions
/// its context allows.
///
/// Every transition publishes its context before its body.
pub(super) struct TerminalSink<W: Write> {
    out: W,
    context: Option<ViewContext>,
}

impl<W: Write> TerminalSink<W> {
    pub(super) fn new(out: W) -> Self {
        Self { out, context: None }
    }
}

impl<W: Write> ContextSink for TerminalSink<W> {
    fn publish_context(&mut self, context: &ViewContext) {
        self.context = Some(context.clone());
    }

    fn publish_panel_body(&mut self, markdown: &str) {
        let footer = self.context.as_ref().map(format_actions).unwrap_or_default();
        let result = writeln!(self.out, "\n{markdown}\n\n{footer}").and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write panel");
        }
    }
}

/// Forwards publications and remembers the latest context.
pub(super) struct Tracked<S> {
    inner: S,
    latest: Option<ViewContext>,
}

impl<S: ContextSink> ContextSink for Tracked<S> {
    fn publish_context(&mut self, context: &ViewContext) {
        self.latest = Some(context.clone());
        self.inner.publish_context(context);
    }

    fn publish_panel_body(&mut self, markdown: &str) {
        self.inner.publish_panel_body(markdown);
    }
}

/// Whether the loop keeps reading.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Flow {
    Continue,
    Quit,
}

/// An engine plus the queue feeding it, bound to one workspace.
pub(super) struct Session<S: ContextSink> {
    engine: Engine<Tracked<S>>,
    sender: EventSender,
    receiver: EventReceiver,
    root: PathBuf,
    tour_dirs: Vec<String>,
    repository: RepositoryIdentity,
}

impl<S: ContextSink> Session<S> {
    pub(super) fn new(
        sink: S,
        root: PathBuf,
        tour_dirs: Vec<String>,
        repository: RepositoryIdentity,
    ) -> Self {
        let (sender, receiver) = channel();
        Self {
            engine: Engine::new(Tracked {
                inner: sink,
                latest: None,
            }),
            sender,
            receiver,
            root,
            tour_dirs,
            repository,
        }
    }

    /// Run discovery and queue its result.
    pub(super) fn refresh(&mut self) -> Result<(), String> {
        let request = self.engine.begin_discovery(self.repository.clone());
        let discovery = discover_tours(&self.root, &self.tour_dirs).map_err(|e| e.to_string())?;
        for skipped in &discovery.skipped {
            eprintln!("skipped: {skipped}");
        }
        self.send(EngineEvent::DiscoveryCompleted {
            request,
            tours: discovery.tours,
        });
        Ok(())
    }

    pub(super) fn execute(&mut self, command: WalkCommand) -> Result<Flow, String> {
        match command {
            WalkCommand::Start(None) => match self.engine.registry().count() {
                0 => return Err("no tours in this workspace".to_string()),
                1 => self.send(EngineEvent::StartTour { index: 0 }),
                _ => return Err("several tours: start <N> or select <N>".to_string()),
            },
            WalkCommand::Start(Some(ordinal)) => {
                let index = self
                    .engine
                    .registry()
                    .resolve_ordinal(&ordinal)
                    .ok_or_else(|| format!("no tour '{ordinal}'"))?;
                self.send(EngineEvent::StartTour { index });
            }
            WalkCommand::Select(input) => self.send(EngineEvent::SelectTour { input }),
            WalkCommand::Next => self.send(EngineEvent::Advance(Direction::Next)),
            WalkCommand::Prev => self.send(EngineEvent::Advance(Direction::Previous)),
            WalkCommand::Complete => self.send(EngineEvent::CompleteTour),
            WalkCommand::Open(address) => {
                let location = parse_address(&address, &self.repository)
                    .ok_or_else(|| format!("not an address in {}: {address}", self.repository))?;
                self.send(EngineEvent::LocationObserved(location));
            }
            WalkCommand::File { path, selection } => {
                let location = match selection {
                    Some(selection) => ObservedLocation::selection(path, selection),
                    None => ObservedLocation::file(path),
                };
                self.send(EngineEvent::LocationObserved(location));
            }
            WalkCommand::Dir(path) => {
                self.send(EngineEvent::LocationObserved(ObservedLocation::directory(path)));
            }
            WalkCommand::Refresh => self.refresh()?,
            WalkCommand::Context => {
                let context = self.latest_context().cloned().unwrap_or_default();
                let json = serde_json::to_string_pretty(&context)
                    .map_err(|e| format!("failed to serialize context: {e}"))?;
                println!("{json}");
            }
            WalkCommand::Help => println!("{WALK_HELP}"),
            WalkCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    pub(super) fn latest_context(&self) -> Option<&ViewContext> {
        self.engine.sink().latest.as_ref()
    }

    fn send(&mut self, event: EngineEvent) {
        if self.sender.send(event) {
            self.receiver.drain(&mut self.engine);
        }
    }
}

/// Discover, then read commands until `quit` or end of input.
pub(super) fn run(
    root: PathBuf,
    tour_dirs: Vec<String>,
    repository: RepositoryIdentity,
    json: bool,
) -> Result<(), String> {
    let stdin = io::stdin().lock();
    if json {
        let sink = JsonLinesSink::new(io::stdout());
        walk(Session::new(sink, root, tour_dirs, repository), stdin)
    } else {
        let sink = TerminalSink::new(io::stdout());
        walk(Session::new(sink, root, tour_dirs, repository), stdin)
    }
}

fn walk<S: ContextSink>(mut session: Session<S>, input: impl BufRead) -> Result<(), String> {
    session.refresh()?;

    for line in input.lines() {
        let line = line.map_err(|e| format!("failed to read input: {e}"))?;
        let command = match WalkCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        tracing::debug!(?command, "walk command");
        match session.execute(command) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}
