//! The tours known for the current workspace.

use crate::model::{RepoTour, RepositoryIdentity};

/// An immutable snapshot of one discovery cycle: the repository it was run
/// against and the tours it found, in ordinal order.
///
/// Snapshots are replaced wholesale, never edited, so the engine never sees
/// a partially updated tour list.
#[derive(Debug, Clone, Default)]
pub struct TourRegistry {
    repository: Option<RepositoryIdentity>,
    tours: Vec<RepoTour>,
}

impl TourRegistry {
    pub fn new(repository: Option<RepositoryIdentity>, tours: Vec<RepoTour>) -> Self {
        Self { repository, tours }
    }

    /// Replace the tour list atomically.
    pub fn set_tours(&mut self, repository: Option<RepositoryIdentity>, tours: Vec<RepoTour>) {
        *self = Self::new(repository, tours);
    }

    pub fn get(&self, index: usize) -> Option<&RepoTour> {
        self.tours.get(index)
    }

    pub fn count(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    pub fn tours(&self) -> &[RepoTour] {
        &self.tours
    }

    pub fn repository(&self) -> Option<&RepositoryIdentity> {
        self.repository.as_ref()
    }

    /// Resolve a 1-based ordinal typed by the user to a registry index.
    ///
    /// Returns `None` for non-numeric, zero, or out-of-range input.
    pub fn resolve_ordinal(&self, input: &str) -> Option<usize> {
        let ordinal: usize = input.trim().parse().ok()?;
        let index = ordinal.checked_sub(1)?;
        (index < self.count()).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::TourDefinition;

    fn tour(name: &str) -> RepoTour {
        RepoTour {
            path: format!(".tours/{name}.tour"),
            name: name.to_string(),
            tour: TourDefinition {
                title: name.to_string(),
                description: None,
                steps: vec![],
            },
        }
    }

    #[test]
    fn get_out_of_range_is_none() {
        let registry = TourRegistry::new(None, vec![tour("a")]);
        assert_eq!(registry.get(0).unwrap().name, "a");
        assert!(registry.get(1).is_none());
    }

    #[test]
    fn set_tours_replaces_everything() {
        let repo = RepositoryIdentity::new("github.com/acme/widgets");
        let mut registry = TourRegistry::new(repo, vec![tour("a"), tour("b")]);

        registry.set_tours(None, vec![tour("c")]);

        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get(0).unwrap().name, "c");
        assert!(registry.repository().is_none());
    }

    #[test]
    fn resolves_one_based_ordinals() {
        let registry = TourRegistry::new(None, vec![tour("a"), tour("b")]);
        assert_eq!(registry.resolve_ordinal("1"), Some(0));
        assert_eq!(registry.resolve_ordinal(" 2 "), Some(1));
        assert_eq!(registry.resolve_ordinal("0"), None);
        assert_eq!(registry.resolve_ordinal("3"), None);
        assert_eq!(registry.resolve_ordinal("two"), None);
        assert_eq!(registry.resolve_ordinal(""), None);
    }
}
