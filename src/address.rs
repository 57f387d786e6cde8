//! Addresses: repository-rooted links to the location of a step.
//!
//! ```text
//! /<repo>/-/tree/<directory>&tab=codeTour
//! /<repo>/-/blob/<file>&tab=codeTour
//! /<repo>/-/blob/<file>#L<line>&tab=codeTour
//! /<repo>/-/blob/<file>#L<line>:<character>&tab=codeTour
//! /<repo>/-/blob/<file>#L<start>-<end>&tab=codeTour
//! ```
//!
//! Positions use the legacy `#L` hash rather than a query parameter, and are
//! 1-based like tour positions. The hash can't carry an end character: a
//! multi-line selection keeps only its lines, and a single-line selection
//! keeps only its start. This is a known precision loss of the format.

use std::fmt;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::compare::normalize_path;
use crate::model::{ObservedLocation, Position, RepositoryIdentity, Selection, Step, StepTarget};

/// Suffix keeping the tour panel open after following a link.
pub const TOUR_TAB_MARKER: &str = "&tab=codeTour";

/// Errors that can occur while building an address.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("content step has no location to address")]
    UnaddressableStep,
}

/// The `#L` fragment a line or selection is encoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFragment {
    /// `#L5`
    Line(u32),

    /// `#L5:3`
    LineColumn { line: u32, character: u32 },

    /// `#L3-7`
    Lines { start: u32, end: u32 },
}

impl LineFragment {
    pub fn for_selection(selection: Selection) -> Self {
        if !selection.is_single_line() {
            Self::Lines {
                start: selection.start.line,
                end: selection.end.line,
            }
        } else if selection.start.character != 0 {
            Self::LineColumn {
                line: selection.start.line,
                character: selection.start.character,
            }
        } else {
            Self::Line(selection.start.line)
        }
    }

    /// The selection a viewer lands on when following this fragment.
    pub fn landing(self) -> Selection {
        match self {
            Self::Line(line) => Selection::cursor(Position { line, character: 0 }),
            Self::LineColumn { line, character } => Selection::cursor(Position { line, character }),
            Self::Lines { start, end } => Selection {
                start: Position {
                    line: start,
                    character: 0,
                },
                end: Position {
                    line: end,
                    character: 0,
                },
            },
        }
    }

    /// Parse a fragment without its leading `#`.
    ///
    /// Character offsets inside ranges (`L3:2-7:4`) are accepted and dropped.
    pub fn parse(fragment: &str) -> Option<Self> {
        let body = fragment.strip_prefix('L')?;

        if let Some((start, end)) = body.split_once('-') {
            return Some(Self::Lines {
                start: range_line(start)?,
                end: range_line(end.strip_prefix('L').unwrap_or(end))?,
            });
        }

        match body.split_once(':') {
            Some((line, character)) => Some(Self::LineColumn {
                line: line.parse().ok()?,
                character: character.parse().ok()?,
            }),
            None => Some(Self::Line(body.parse().ok()?)),
        }
    }
}

fn range_line(part: &str) -> Option<u32> {
    part.split(':').next()?.parse().ok()
}

impl fmt::Display for LineFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "L{line}"),
            Self::LineColumn { line, character } => write!(f, "L{line}:{character}"),
            Self::Lines { start, end } => write!(f, "L{start}-{end}"),
        }
    }
}

/// Build the address a "new location" action links to.
///
/// Content steps have nowhere to link to; callers check with the comparator
/// first, so [`AddressError::UnaddressableStep`] means a caller bug.
pub fn build_address(step: &Step, repository: &RepositoryIdentity) -> Result<String, AddressError> {
    let address = match step.target() {
        StepTarget::Directory { path } => {
            format!("/{repository}/-/tree/{}", normalize_path(path))
        }
        StepTarget::File { path } => format!("/{repository}/-/blob/{}", normalize_path(path)),
        StepTarget::Line { path, line } => format!(
            "/{repository}/-/blob/{}#{}",
            normalize_path(path),
            LineFragment::Line(line)
        ),
        StepTarget::Selection { path, selection } => format!(
            "/{repository}/-/blob/{}#{}",
            normalize_path(path),
            LineFragment::for_selection(selection)
        ),
        StepTarget::Content => return Err(AddressError::UnaddressableStep),
    };

    Ok(address + TOUR_TAB_MARKER)
}

/// Resolve an address back into the location the viewer would show.
///
/// Accepts relative addresses as built by [`build_address`] and absolute
/// URLs on any host. The path of an absolute URL is percent-decoded.
/// Returns `None` for addresses outside `repository` or with a malformed
/// fragment.
pub fn parse_address(address: &str, repository: &RepositoryIdentity) -> Option<ObservedLocation> {
    let address = address.trim();
    let (path, fragment) = match Url::parse(address) {
        Ok(url) => {
            let path = percent_decode_str(url.path()).decode_utf8().ok()?.into_owned();
            (path, url.fragment().map(String::from))
        }
        Err(_) => match address.split_once('#') {
            Some((path, fragment)) => (path.to_string(), Some(fragment.to_string())),
            None => (address.to_string(), None),
        },
    };

    let path = path.strip_suffix(TOUR_TAB_MARKER).unwrap_or(&path);
    let rest = path
        .strip_prefix('/')?
        .strip_prefix(repository.as_str())?
        .strip_prefix("/-/")?;

    if let Some(directory) = rest.strip_prefix("tree/") {
        return Some(ObservedLocation::directory(directory));
    }

    let file = rest.strip_prefix("blob/")?;
    match fragment {
        None => Some(ObservedLocation::file(file)),
        Some(fragment) => {
            let fragment = fragment.strip_suffix(TOUR_TAB_MARKER).unwrap_or(&fragment);
            let fragment = LineFragment::parse(fragment)?;
            Some(ObservedLocation::selection(file, fragment.landing()))
        }
    }
}
