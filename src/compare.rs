//! Location comparison: is a step already on screen, or does reaching it
//! require sending the viewer somewhere else?
//!
//! Content steps have no location. As the *candidate* of a step-to-step
//! comparison they always count as "already there" (the panel re-renders in
//! place); as the *target* of an observed navigation they never match.

use crate::address::LineFragment;
use crate::model::{ObservedLocation, Selection, Step, StepTarget};

/// Strip leading `./` and surrounding slashes so equivalent spellings compare equal.
pub fn normalize_path(path: &str) -> &str {
    let mut path = path.trim();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path.trim_matches('/')
}

fn same_path(a: &str, b: &str) -> bool {
    normalize_path(a) == normalize_path(b)
}

/// Whether moving from `base` to `candidate` can be rendered in place.
pub fn is_same_location(base: &Step, candidate: &Step) -> bool {
    match (base.target(), candidate.target()) {
        (_, StepTarget::Content) => true,
        (StepTarget::Directory { path: a }, StepTarget::Directory { path: b })
        | (StepTarget::File { path: a }, StepTarget::File { path: b }) => same_path(a, b),
        (
            StepTarget::Line {
                path: a,
                line: line_a,
            },
            StepTarget::Line {
                path: b,
                line: line_b,
            },
        ) => same_path(a, b) && line_a == line_b,
        (
            StepTarget::Selection {
                path: a,
                selection: selection_a,
            },
            StepTarget::Selection {
                path: b,
                selection: selection_b,
            },
        ) => same_path(a, b) && selection_a == selection_b,
        _ => false,
    }
}

/// Whether the viewer showing `observed` means it has arrived at `candidate`.
///
/// Line and selection steps need a selection or cursor in the observation.
/// A selection step matches either its exact range or the range its address
/// lands on, so following a generated link is always recognised.
pub fn matches_observed_location(candidate: &Step, observed: &ObservedLocation) -> bool {
    match (candidate.target(), observed) {
        (StepTarget::Directory { path }, ObservedLocation::DirectoryView { path: seen })
        | (StepTarget::File { path }, ObservedLocation::FileView { path: seen, .. }) => {
            same_path(path, seen)
        }
        (
            StepTarget::Line { path, line },
            ObservedLocation::FileView {
                path: seen,
                selection: Some(seen_selection),
            },
        ) => same_path(path, seen) && seen_selection.spans_only_line(line),
        (
            StepTarget::Selection { path, selection },
            ObservedLocation::FileView {
                path: seen,
                selection: Some(seen_selection),
            },
        ) => same_path(path, seen) && selection_coincides(selection, seen_selection),
        _ => false,
    }
}

fn selection_coincides(expected: Selection, observed: &Selection) -> bool {
    expected == *observed || LineFragment::for_selection(expected).landing() == *observed
}
