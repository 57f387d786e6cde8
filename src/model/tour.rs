//! Tour definitions and their binding to a workspace.

use serde::{Deserialize, Serialize};

use super::step::Step;

/// A tour as written in a `.tour` file.
///
/// Unknown keys (`$schema`, `ref`, `isPrimary`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourDefinition {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub steps: Vec<Step>,
}

impl TourDefinition {
    /// Parse a tour from the JSON contents of a `.tour` file.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A tour bound to the file it was discovered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoTour {
    /// Repository-relative path of the tour file (e.g. `.tours/intro.tour`).
    pub path: String,

    /// File stem of the tour file.
    pub name: String,

    pub tour: TourDefinition,
}

impl RepoTour {
    pub fn step_count(&self) -> usize {
        self.tour.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.tour.steps.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::StepKind;

    #[test]
    fn parses_minimal_tour() {
        let tour = TourDefinition::from_json(
            r#"{
                "$schema": "https://aka.ms/codetour-schema",
                "title": "Intro",
                "steps": [
                    { "description": "Welcome." },
                    { "description": "The readme.", "file": "README.md" },
                    { "description": "Sources.", "directory": "src" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(tour.title, "Intro");
        assert!(tour.description.is_none());
        let kinds: Vec<StepKind> = tour.steps.iter().map(Step::kind).collect();
        assert_eq!(
            kinds,
            vec![StepKind::Content, StepKind::File, StepKind::Directory]
        );
    }

    #[test]
    fn rejects_tour_without_steps() {
        assert!(TourDefinition::from_json(r#"{ "title": "Empty" }"#).is_err());
    }

    #[test]
    fn rejects_step_without_description() {
        let err = TourDefinition::from_json(
            r#"{ "title": "Broken", "steps": [ { "file": "README.md" } ] }"#,
        );
        assert!(err.is_err());
    }
}
