//! Steps: single stops in a tour, and how they are classified.

use serde::{Deserialize, Serialize};

/// A position inside a file, in tour file coordinates.
///
/// Lines are 1-based, matching the `.tour` format and the `#L` fragments
/// of generated addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// A range between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    /// A zero-width range at a single cursor position.
    pub fn cursor(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Whether both ends of the range sit on `line`.
    pub fn spans_only_line(&self, line: u32) -> bool {
        self.start.line == line && self.end.line == line
    }
}

/// One stop in a tour, exactly as written in a `.tour` file.
///
/// Any combination of the optional location fields is accepted.
/// What the step points at is derived by [`Step::target`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The step body, rendered as markdown.
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

/// The semantic kind of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    Directory,
    File,
    Line,
    Selection,
    Content,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
            Self::Line => "line",
            Self::Selection => "selection",
            Self::Content => "content",
        }
    }
}

/// What a step points at, borrowed from the step.
///
/// This is the tagged view of a step: exactly one variant holds
/// for any field combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTarget<'a> {
    Directory { path: &'a str },
    File { path: &'a str },
    Line { path: &'a str, line: u32 },
    Selection { path: &'a str, selection: Selection },
    Content,
}

impl StepTarget<'_> {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Directory { .. } => StepKind::Directory,
            Self::File { .. } => StepKind::File,
            Self::Line { .. } => StepKind::Line,
            Self::Selection { .. } => StepKind::Selection,
            Self::Content => StepKind::Content,
        }
    }
}

impl Step {
    /// Resolve the location this step points at.
    ///
    /// Precedence when fields are redundant: file with line, then file with
    /// selection, then file alone, then directory. Anything else is content.
    pub fn target(&self) -> StepTarget<'_> {
        match (self.file.as_deref(), self.line, self.selection, self.directory.as_deref()) {
            (Some(path), Some(line), _, _) => StepTarget::Line { path, line },
            (Some(path), None, Some(selection), _) => StepTarget::Selection { path, selection },
            (Some(path), None, None, _) => StepTarget::File { path },
            (None, _, _, Some(path)) => StepTarget::Directory { path },
            (None, _, _, None) => StepTarget::Content,
        }
    }

    pub fn kind(&self) -> StepKind {
        self.target().kind()
    }

    /// Narrative-only steps have no location to navigate to.
    pub fn is_content(&self) -> bool {
        self.kind() == StepKind::Content
    }
}

/// Classify a step into its semantic kind.
pub fn classify(step: &Step) -> StepKind {
    step.kind()
}
