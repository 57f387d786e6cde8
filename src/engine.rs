//! The navigation engine: which tour and step are active, and what the UI
//! may do next.
//!
//! Every entry point turns into an [`EngineEvent`]. The event is first
//! *planned* against a read-only view of the engine, producing either
//! nothing (the event doesn't apply in the current state) or a complete
//! [`plan::Transition`]. Only a successful plan is committed: the new state,
//! the new registry if any, and every publication are applied together.
//! A failed plan leaves the engine exactly as it was.

mod panel;
mod plan;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::AddressError;
use crate::model::{ObservedLocation, RepoTour, RepositoryIdentity};
use crate::publish::ContextSink;
use crate::registry::TourRegistry;

pub use panel::{location_label, render_listing, render_step};

use plan::{Effect, Snapshot, Transition};

/// Errors that abort a single transition.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("no repository is bound to the current tours")]
    NoRepository,

    #[error("tour {0} is not in the registry")]
    UnknownTour(usize),

    #[error("tour {tour} has no step {step}")]
    UnknownStep { tour: usize, step: usize },
}

/// Where the engine stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum TourState {
    /// No tours known: nothing discovered yet, or the workspace has none.
    Idle,

    /// Tours are known, none is active.
    Browsing,

    /// A tour is active. `step` is always a valid index into its steps.
    Touring { tour: usize, step: usize },
}

/// Which neighbour of the current step to move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Previous,
    Next,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Previous => f.write_str("previous"),
            Self::Next => f.write_str("next"),
        }
    }
}

/// Identifies one discovery run. Only the most recently issued request
/// may commit its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoveryRequest(u64);

impl fmt::Display for DiscoveryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A discovery run finished.
    DiscoveryCompleted {
        request: DiscoveryRequest,
        tours: Vec<RepoTour>,
    },

    /// The user answered the "which tour?" prompt. `None` means they cancelled.
    SelectTour { input: Option<String> },

    StartTour { index: usize },

    Advance(Direction),

    CompleteTour,

    /// The viewer moved, for whatever reason.
    LocationObserved(ObservedLocation),
}

impl EngineEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::DiscoveryCompleted { .. } => "discovery-completed",
            Self::SelectTour { .. } => "select-tour",
            Self::StartTour { .. } => "start-tour",
            Self::Advance(Direction::Previous) => "advance-previous",
            Self::Advance(Direction::Next) => "advance-next",
            Self::CompleteTour => "complete-tour",
            Self::LocationObserved(_) => "location-observed",
        }
    }
}

/// Request ids issued so far, and the one still allowed to commit.
#[derive(Debug, Default)]
struct DiscoveryFence {
    issued: u64,
    pending: Option<(DiscoveryRequest, RepositoryIdentity)>,
}

impl DiscoveryFence {
    fn issue(&mut self, repository: RepositoryIdentity) -> DiscoveryRequest {
        self.issued += 1;
        let request = DiscoveryRequest(self.issued);
        self.pending = Some((request, repository));
        request
    }

    /// The repository of `request`, if it is the latest and still unanswered.
    fn accepts(&self, request: DiscoveryRequest) -> Option<&RepositoryIdentity> {
        match &self.pending {
            Some((latest, repository)) if *latest == request => Some(repository),
            _ => None,
        }
    }
}

/// The navigation state machine, publishing into a [`ContextSink`].
///
/// Single-threaded: feed it from one thread, directly or through
/// [`crate::queue`].
pub struct Engine<S: ContextSink> {
    state: TourState,
    registry: TourRegistry,
    fence: DiscoveryFence,
    sink: S,
}

impl<S: ContextSink> Engine<S> {
    pub fn new(sink: S) -> Self {
        Self {
            state: TourState::Idle,
            registry: TourRegistry::default(),
            fence: DiscoveryFence::default(),
            sink,
        }
    }

    pub fn state(&self) -> TourState {
        self.state
    }

    pub fn registry(&self) -> &TourRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Issue a new discovery request for `repository`.
    ///
    /// Any request issued earlier becomes stale: its result will be dropped.
    pub fn begin_discovery(&mut self, repository: RepositoryIdentity) -> DiscoveryRequest {
        let request = self.fence.issue(repository);
        tracing::debug!(%request, "discovery requested");
        request
    }

    pub fn discovery_completed(&mut self, tours: Vec<RepoTour>, request: DiscoveryRequest) {
        self.handle(EngineEvent::DiscoveryCompleted { request, tours });
    }

    pub fn select_tour(&mut self, input: Option<&str>) {
        self.handle(EngineEvent::SelectTour {
            input: input.map(String::from),
        });
    }

    pub fn start_tour(&mut self, index: usize) {
        self.handle(EngineEvent::StartTour { index });
    }

    pub fn advance(&mut self, direction: Direction) {
        self.handle(EngineEvent::Advance(direction));
    }

    pub fn complete_tour(&mut self) {
        self.handle(EngineEvent::CompleteTour);
    }

    pub fn observed_location_changed(&mut self, location: ObservedLocation) {
        self.handle(EngineEvent::LocationObserved(location));
    }

    /// Plan and, if the plan succeeds, commit one event.
    pub fn handle(&mut self, event: EngineEvent) {
        let name = event.name();
        match self.plan(event) {
            Ok(Some(transition)) => self.commit(name, transition),
            Ok(None) => tracing::debug!(event = name, state = ?self.state, "event ignored"),
            Err(e) => tracing::error!(event = name, state = ?self.state, error = %e, "transition aborted"),
        }
    }

    fn plan(&self, event: EngineEvent) -> Result<Option<Transition>, EngineError> {
        let snapshot = Snapshot {
            state: self.state,
            registry: &self.registry,
        };

        match event {
            EngineEvent::DiscoveryCompleted { request, tours } => {
                let Some(repository) = self.fence.accepts(request) else {
                    tracing::debug!(%request, "stale discovery result dropped");
                    return Ok(None);
                };
                let registry = TourRegistry::new(Some(repository.clone()), tours);
                Ok(Some(plan::discovered(registry)))
            }
            EngineEvent::SelectTour { input } => snapshot.select_tour(input.as_deref()),
            EngineEvent::StartTour { index } => snapshot.start_tour(index),
            EngineEvent::Advance(direction) => snapshot.advance(direction),
            EngineEvent::CompleteTour => Ok(snapshot.complete_tour()),
            EngineEvent::LocationObserved(location) => snapshot.location_observed(&location),
        }
    }

    fn commit(&mut self, event: &'static str, transition: Transition) {
        let Transition {
            state,
            registry,
            effects,
        } = transition;

        if let Some(registry) = registry {
            self.registry = registry;
            self.fence.pending = None;
        }
        self.state = state;

        for effect in effects {
            match effect {
                Effect::PublishContext(context) => self.sink.publish_context(&context),
                Effect::PublishPanelBody(markdown) => self.sink.publish_panel_body(&markdown),
            }
        }

        tracing::info!(event, state = ?self.state, "transition committed");
    }
}

#[cfg(test)]
mod tests;
