//! Publishing: the one-way boundary from the engine to the UI layer.
//!
//! The engine always hands over complete objects, so sinks never merge.

use std::io::Write;

use serde::Serialize;

use crate::model::ViewContext;

/// Where the engine pushes derived state.
pub trait ContextSink {
    /// Replace the UI's view context.
    fn publish_context(&mut self, context: &ViewContext);

    /// Replace the tour panel's body.
    fn publish_panel_body(&mut self, markdown: &str);
}

/// Keeps every publication in order.
///
/// For hosts that poll rather than react, and for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub contexts: Vec<ViewContext>,
    pub panel_bodies: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest_context(&self) -> Option<&ViewContext> {
        self.contexts.last()
    }

    pub fn latest_panel_body(&self) -> Option<&str> {
        self.panel_bodies.last().map(String::as_str)
    }
}

impl ContextSink for RecordingSink {
    fn publish_context(&mut self, context: &ViewContext) {
        self.contexts.push(context.clone());
    }

    fn publish_panel_body(&mut self, markdown: &str) {
        self.panel_bodies.push(markdown.to_string());
    }
}

/// A single published record, serialized as one line of JSONL.
///
/// Tagged so each line is self-describing.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Publication<'a> {
    Context { context: &'a ViewContext },
    PanelBody { markdown: &'a str },
}

/// Writes each publication as a JSON line, for hosts driving the engine
/// over a pipe.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, publication: &Publication<'_>) {
        let result = serde_json::to_string(publication)
            .map_err(std::io::Error::from)
            .and_then(|line| writeln!(self.out, "{line}"))
            .and_then(|()| self.out.flush());

        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write publication");
        }
    }
}

impl<W: Write> ContextSink for JsonLinesSink<W> {
    fn publish_context(&mut self, context: &ViewContext) {
        self.write(&Publication::Context { context });
    }

    fn publish_panel_body(&mut self, markdown: &str) {
        self.write(&Publication::PanelBody { markdown });
    }
}
