//! Markdown bodies for the tour panel.

use std::fmt::Write;

use crate::address::LineFragment;
use crate::model::{RepoTour, Step, StepTarget};
use crate::registry::TourRegistry;

/// Body shown while no tour is active: a summary for a single tour,
/// a numbered listing for several.
pub fn render_listing(registry: &TourRegistry) -> String {
    match registry.tours() {
        [] => "No code tours found in this repository.".to_string(),
        [only] => {
            let mut body = format!("## {}\n\n", only.tour.title);
            if let Some(description) = &only.tour.description {
                let _ = write!(body, "{description}\n\n");
            }
            body.push_str(&count_steps(only.step_count()));
            body
        }
        tours => {
            let mut body = String::from("## Code tours\n");
            for (i, tour) in tours.iter().enumerate() {
                let _ = write!(
                    body,
                    "\n{}. **{}** ({})",
                    i + 1,
                    tour.tour.title,
                    count_steps(tour.step_count())
                );
                if let Some(description) = &tour.tour.description {
                    let _ = write!(body, ": {description}");
                }
            }
            body
        }
    }
}

/// Body for step `index` of `tour`. Step numbers are 1-based.
pub fn render_step(tour: &RepoTour, index: usize) -> String {
    let mut body = format!("## {}\n\n", tour.tour.title);
    let Some(step) = tour.step(index) else {
        return body;
    };

    let _ = write!(body, "**Step {} of {}**", index + 1, tour.step_count());
    if let Some(title) = &step.title {
        let _ = write!(body, ": {title}");
    }
    body.push_str("\n\n");

    if let Some(label) = location_label(step) {
        let _ = write!(body, "_{label}_\n\n");
    }
    body.push_str(&step.description);
    body
}

/// Short human description of where a step points, `None` for content steps.
pub fn location_label(step: &Step) -> Option<String> {
    let label = match step.target() {
        StepTarget::Directory { path } => format!("`{path}` (directory)"),
        StepTarget::File { path } => format!("`{path}`"),
        StepTarget::Line { path, line } => format!("`{path}`, line {line}"),
        StepTarget::Selection { path, selection } => {
            match LineFragment::for_selection(selection) {
                LineFragment::Lines { start, end } => format!("`{path}`, lines {start}-{end}"),
                LineFragment::Line(line) | LineFragment::LineColumn { line, .. } => {
                    format!("`{path}`, line {line}")
                }
            }
        }
        StepTarget::Content => return None,
    };
    Some(label)
}

fn count_steps(count: usize) -> String {
    if count == 1 {
        "1 step".to_string()
    } else {
        format!("{count} steps")
    }
}
