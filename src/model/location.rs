//! Locations reported by the viewer.

use serde::{Deserialize, Serialize};

use super::step::{Position, Selection};

/// Where the viewer currently is, as reported by the host.
///
/// Positions use tour file coordinates; the host converts before reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ObservedLocation {
    /// A directory listing.
    DirectoryView { path: String },

    /// A file, optionally with a selection or cursor.
    FileView {
        path: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        selection: Option<Selection>,
    },
}

impl ObservedLocation {
    pub fn directory(path: impl Into<String>) -> Self {
        Self::DirectoryView { path: path.into() }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self::FileView {
            path: path.into(),
            selection: None,
        }
    }

    /// A file view with a zero-width cursor.
    pub fn cursor(path: impl Into<String>, line: u32, character: u32) -> Self {
        Self::FileView {
            path: path.into(),
            selection: Some(Selection::cursor(Position { line, character })),
        }
    }

    pub fn selection(path: impl Into<String>, selection: Selection) -> Self {
        Self::FileView {
            path: path.into(),
            selection: Some(selection),
        }
    }
}
