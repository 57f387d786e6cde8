//! Core data model for code tours.
//!
//! These types describe what the engine consumes and produces:
//! tour definitions and their steps, the repository they belong to,
//! locations observed in the viewer, and the derived view context.

mod context;
mod location;
mod repository;
mod step;
mod tour;

pub use context::{NeighbourAction, ViewContext};
pub use location::ObservedLocation;
pub use repository::RepositoryIdentity;
pub use step::{Position, Selection, Step, StepKind, StepTarget, classify};
pub use tour::{RepoTour, TourDefinition};
