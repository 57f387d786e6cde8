//! Output formatting for CLI display.

use std::fmt::Write;

use crate::address::build_address;
use crate::engine::location_label;
use crate::model::{RepoTour, RepositoryIdentity, ViewContext};
use crate::registry::TourRegistry;

/// One line per tour: ordinal, step count, title, and where it was loaded from.
pub(super) fn format_tour_list(registry: &TourRegistry) -> String {
    if registry.is_empty() {
        return "No tours".to_string();
    }

    let mut out = String::new();
    for (i, tour) in registry.tours().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. [{:>2} steps]  {}  ({})",
            i + 1,
            tour.step_count(),
            tour.tour.title,
            tour.path
        );
    }
    out.pop();
    out
}

/// The steps of one tour with their kinds, locations, and addresses.
///
/// Addresses are only shown when a repository is known.
pub(super) fn format_steps(tour: &RepoTour, repository: Option<&RepositoryIdentity>) -> String {
    let mut out = format!("{} ({})\n", tour.tour.title, tour.path);
    if let Some(description) = &tour.tour.description {
        let _ = writeln!(out, "{description}");
    }

    for (i, step) in tour.tour.steps.iter().enumerate() {
        let title = step.title.as_deref().unwrap_or("(untitled)");
        let _ = write!(out, "\n{:>3}. [{}] {title}", i + 1, step.kind().as_str());
        if let Some(label) = location_label(step) {
            let _ = write!(out, "\n     {label}");
        }
        if let Some(repository) = repository
            && let Ok(address) = build_address(step, repository)
        {
            let _ = write!(out, "\n     {address}");
        }
    }
    out
}

/// What the user can do next, derived from the published context.
pub(super) fn format_actions(context: &ViewContext) -> String {
    if !context.is_touring() {
        let mut out = String::new();
        if context.tour_completed {
            out.push_str("Tour completed.\n");
        }
        if context.workspace_has_multiple_tours {
            out.push_str("Actions: start <N>, select <N>, refresh");
        } else if context.workspace_has_one_tour {
            out.push_str("Actions: start, refresh");
        } else {
            out.push_str("Actions: refresh");
        }
        return out;
    }

    let mut out = format!(
        "── {} · step {} of {} ──",
        context.active_tour_title.as_deref().unwrap_or_default(),
        context.active_step.map_or(0, |s| s + 1),
        context.step_count.unwrap_or_default()
    );

    if context.show_prev_step_same_location() {
        out.push_str("\n  prev      (same location)");
    } else if context.show_prev_step_new_location() {
        let _ = write!(out, "\n  prev      → {}", context.prev_step_address());
    }

    if context.show_next_step_same_location() {
        out.push_str("\n  next      (same location)");
    } else if context.show_next_step_new_location() {
        let _ = write!(out, "\n  next      → {}", context.next_step_address());
    }

    if context.show_complete_tour {
        out.push_str("\n  complete");
    }
    out
}
