//! View context: the flag set the UI layer keys its actions on.

use serde::Serialize;

/// What the "previous" or "next" action does from the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeighbourAction {
    /// There is no such step.
    Absent,

    /// The step is where the viewer already is; the panel re-renders in place.
    SameLocation,

    /// The step lives elsewhere; the action links to this address.
    NewLocation(String),
}

/// A complete snapshot of UI-relevant state, published after every transition.
///
/// Neighbour flags are private and only written through [`ViewContext::set_prev`]
/// and [`ViewContext::set_next`], so the same-location and new-location flags
/// of one direction can't both be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewContext {
    pub workspace_has_tours: bool,
    pub workspace_has_one_tour: bool,
    pub workspace_has_multiple_tours: bool,

    /// Registry index of the active tour.
    pub active_tour: Option<usize>,
    pub active_tour_title: Option<String>,

    /// Zero-based index of the current step.
    pub active_step: Option<usize>,
    pub step_count: Option<usize>,

    show_prev_step_same_location: bool,
    show_prev_step_new_location: bool,
    prev_step_address: String,

    show_next_step_same_location: bool,
    show_next_step_new_location: bool,
    next_step_address: String,

    /// The current step is the last one.
    pub show_complete_tour: bool,

    /// The last tour was finished, either by stepping past its end or explicitly.
    pub tour_completed: bool,
}

impl ViewContext {
    /// Context for a workspace with `tour_count` tours and nothing active.
    pub fn for_workspace(tour_count: usize) -> Self {
        Self {
            workspace_has_tours: tour_count > 0,
            workspace_has_one_tour: tour_count == 1,
            workspace_has_multiple_tours: tour_count > 1,
            ..Self::default()
        }
    }

    pub fn set_prev(&mut self, action: NeighbourAction) {
        let (same, new, address) = flags(action);
        self.show_prev_step_same_location = same;
        self.show_prev_step_new_location = new;
        self.prev_step_address = address;
    }

    pub fn set_next(&mut self, action: NeighbourAction) {
        let (same, new, address) = flags(action);
        self.show_next_step_same_location = same;
        self.show_next_step_new_location = new;
        self.next_step_address = address;
    }

    pub fn is_touring(&self) -> bool {
        self.active_tour.is_some()
    }

    pub fn show_prev_step_same_location(&self) -> bool {
        self.show_prev_step_same_location
    }

    pub fn show_prev_step_new_location(&self) -> bool {
        self.show_prev_step_new_location
    }

    /// Empty unless the previous step is at a new location.
    pub fn prev_step_address(&self) -> &str {
        &self.prev_step_address
    }

    pub fn show_next_step_same_location(&self) -> bool {
        self.show_next_step_same_location
    }

    pub fn show_next_step_new_location(&self) -> bool {
        self.show_next_step_new_location
    }

    /// Empty unless the next step is at a new location.
    pub fn next_step_address(&self) -> &str {
        &self.next_step_address
    }
}

fn flags(action: NeighbourAction) -> (bool, bool, String) {
    match action {
        NeighbourAction::Absent => (false, false, String::new()),
        NeighbourAction::SameLocation => (true, false, String::new()),
        NeighbourAction::NewLocation(address) => (false, true, address),
    }
}
