//! Planning: what an event would do, computed without touching the engine.

use crate::address::build_address;
use crate::compare::{is_same_location, matches_observed_location};
use crate::model::{NeighbourAction, ObservedLocation, RepoTour, Step, ViewContext};
use crate::registry::TourRegistry;

use super::panel::{render_listing, render_step};
use super::{Direction, EngineError, TourState};

/// One publication the shell performs on commit.
#[derive(Debug)]
pub(super) enum Effect {
    PublishContext(ViewContext),
    PublishPanelBody(String),
}

/// Everything a committed event changes.
#[derive(Debug)]
pub(super) struct Transition {
    pub state: TourState,

    /// Replacement registry, for discovery results only.
    pub registry: Option<TourRegistry>,

    pub effects: Vec<Effect>,
}

/// Accept a fresh registry: nothing active, tour listing on the panel.
pub(super) fn discovered(registry: TourRegistry) -> Transition {
    let state = if registry.is_empty() {
        TourState::Idle
    } else {
        TourState::Browsing
    };
    let effects = vec![
        Effect::PublishContext(ViewContext::for_workspace(registry.count())),
        Effect::PublishPanelBody(render_listing(&registry)),
    ];

    Transition {
        state,
        registry: Some(registry),
        effects,
    }
}

/// A read-only view of the engine to plan against.
pub(super) struct Snapshot<'a> {
    pub state: TourState,
    pub registry: &'a TourRegistry,
}

impl Snapshot<'_> {
    pub fn select_tour(&self, input: Option<&str>) -> Result<Option<Transition>, EngineError> {
        if self.registry.count() < 2 {
            return Ok(None);
        }
        let Some(input) = input else {
            return Ok(None);
        };
        match self.registry.resolve_ordinal(input) {
            Some(index) => self.start_tour(index),
            None => {
                tracing::debug!(input, "invalid tour selection");
                Ok(None)
            }
        }
    }

    /// Land on the first step by advancing from before it, so the first step
    /// goes through the same rendering as every other step.
    pub fn start_tour(&self, index: usize) -> Result<Option<Transition>, EngineError> {
        if self.registry.get(index).is_none() {
            return Ok(None);
        }
        self.advance_from(index, None, Direction::Next)
    }

    pub fn advance(&self, direction: Direction) -> Result<Option<Transition>, EngineError> {
        match self.state {
            TourState::Touring { tour, step } => self.advance_from(tour, Some(step), direction),
            TourState::Idle | TourState::Browsing => Ok(None),
        }
    }

    pub fn complete_tour(&self) -> Option<Transition> {
        match self.state {
            TourState::Touring { .. } => Some(self.complete()),
            TourState::Idle | TourState::Browsing => None,
        }
    }

    /// Catch a user who followed a step link instead of using the panel.
    ///
    /// Only the immediate neighbours are candidates. When both match, the
    /// next step wins.
    pub fn location_observed(
        &self,
        location: &ObservedLocation,
    ) -> Result<Option<Transition>, EngineError> {
        let TourState::Touring { tour, step } = self.state else {
            return Ok(None);
        };
        let repo_tour = self.tour(tour)?;

        let matches = |index: Option<usize>| {
            index
                .and_then(|i| repo_tour.step(i))
                .is_some_and(|candidate| matches_observed_location(candidate, location))
        };

        if matches(step.checked_add(1)) {
            self.advance_from(tour, Some(step), Direction::Next)
        } else if matches(step.checked_sub(1)) {
            self.advance_from(tour, Some(step), Direction::Previous)
        } else {
            Ok(None)
        }
    }

    /// `current` of `None` means "before the first step".
    fn advance_from(
        &self,
        tour: usize,
        current: Option<usize>,
        direction: Direction,
    ) -> Result<Option<Transition>, EngineError> {
        let target = match (current, direction) {
            (None, Direction::Next) => 0,
            (Some(step), Direction::Next) => step + 1,
            (None | Some(0), Direction::Previous) => return Ok(None),
            (Some(step), Direction::Previous) => step - 1,
        };

        if target >= self.tour(tour)?.step_count() {
            return Ok(Some(self.complete()));
        }
        self.land(tour, target).map(Some)
    }

    fn land(&self, tour: usize, index: usize) -> Result<Transition, EngineError> {
        let repo_tour = self.tour(tour)?;
        let current = repo_tour
            .step(index)
            .ok_or(EngineError::UnknownStep { tour, step: index })?;

        let mut context = ViewContext::for_workspace(self.registry.count());
        context.active_tour = Some(tour);
        context.active_tour_title = Some(repo_tour.tour.title.clone());
        context.active_step = Some(index);
        context.step_count = Some(repo_tour.step_count());

        let prev = self.neighbour(repo_tour, current, index.checked_sub(1))?;
        let next = self.neighbour(repo_tour, current, index.checked_add(1))?;
        context.show_complete_tour = next == NeighbourAction::Absent;
        context.set_prev(prev);
        context.set_next(next);

        Ok(Transition {
            state: TourState::Touring { tour, step: index },
            registry: None,
            effects: vec![
                Effect::PublishContext(context),
                Effect::PublishPanelBody(render_step(repo_tour, index)),
            ],
        })
    }

    fn neighbour(
        &self,
        repo_tour: &RepoTour,
        current: &Step,
        index: Option<usize>,
    ) -> Result<NeighbourAction, EngineError> {
        let Some(neighbour) = index.and_then(|i| repo_tour.step(i)) else {
            return Ok(NeighbourAction::Absent);
        };
        if is_same_location(current, neighbour) {
            return Ok(NeighbourAction::SameLocation);
        }
        let repository = self
            .registry
            .repository()
            .ok_or(EngineError::NoRepository)?;
        Ok(NeighbourAction::NewLocation(build_address(
            neighbour, repository,
        )?))
    }

    fn complete(&self) -> Transition {
        let mut context = ViewContext::for_workspace(self.registry.count());
        context.tour_completed = true;

        Transition {
            state: if self.registry.is_empty() {
                TourState::Idle
            } else {
                TourState::Browsing
            },
            registry: None,
            effects: vec![
                Effect::PublishContext(context),
                Effect::PublishPanelBody(render_listing(self.registry)),
            ],
        }
    }

    fn tour(&self, index: usize) -> Result<&RepoTour, EngineError> {
        self.registry
            .get(index)
            .ok_or(EngineError::UnknownTour(index))
    }
}
