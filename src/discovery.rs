//! Filesystem discovery: find and load `.tour` files in a workspace checkout.
//!
//! Tours live anywhere under one of the tour directories:
//!
//! ```text
//! <root>/.tours/**/*.tour
//! <root>/.vscode/tours/**/*.tour
//! <root>/.github/tours/**/*.tour
//! ```
//!
//! A file that can't be read or parsed is skipped; the rest still load.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use ignore::{DirEntry, WalkBuilder};

use crate::model::{RepoTour, TourDefinition};

/// Tour directories searched when none are configured.
pub const DEFAULT_TOUR_DIRS: [&str; 3] = [".tours", ".vscode/tours", ".github/tours"];

/// Errors that can occur during discovery.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("workspace root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: ignore::Error,
    },

    #[error("invalid tour file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// What one discovery run found.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Loaded tours, ordered by path.
    pub tours: Vec<RepoTour>,

    /// Tour files that were found but couldn't be loaded.
    pub skipped: Vec<DiscoveryError>,
}

/// Find every tour file under `root` in the given tour directories.
///
/// Only a missing root is an error. Malformed tour files end up in
/// [`Discovery::skipped`].
pub fn discover_tours(root: &Path, tour_dirs: &[String]) -> Result<Discovery, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::RootNotFound(root.to_path_buf()));
    }

    let mut discovery = Discovery::default();

    for dir in tour_dirs {
        let dir = root.join(dir.trim_matches('/'));
        if !dir.is_dir() {
            continue;
        }

        let walker = WalkBuilder::new(&dir)
            .hidden(false)
            .sort_by_file_name(Ord::cmp)
            .build();

        for entry in walker {
            let Some(entry) = accept_entry(entry, &dir, &mut discovery.skipped) else {
                continue;
            };
            let path = entry.path();
            let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
            if !is_file || path.extension().is_none_or(|ext| ext != "tour") {
                continue;
            }

            match load_tour(path) {
                Ok(tour) => discovery.tours.push(RepoTour {
                    path: relative_path(root, path),
                    name: path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    tour,
                }),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping tour file");
                    discovery.skipped.push(e);
                }
            }
        }
    }

    discovery.tours.sort_by(|a, b| a.path.cmp(&b.path));
    discovery.tours.dedup_by(|a, b| a.path == b.path);
    tracing::debug!(
        root = %root.display(),
        found = discovery.tours.len(),
        skipped = discovery.skipped.len(),
        "discovery finished"
    );
    Ok(discovery)
}

/// Unwrap a walk entry; a walk error is logged and recorded like a bad tour file.
fn accept_entry(
    entry: Result<DirEntry, ignore::Error>,
    dir: &Path,
    skipped: &mut Vec<DiscoveryError>,
) -> Option<DirEntry> {
    match entry {
        Ok(entry) => Some(entry),
        Err(source) => {
            let e = DiscoveryError::Walk {
                path: dir.to_path_buf(),
                source,
            };
            tracing::warn!(error = %e, "skipping unreadable entry");
            skipped.push(e);
            None
        }
    }
}

/// Read and parse a single tour file.
pub fn load_tour(path: &Path) -> Result<TourDefinition, DiscoveryError> {
    let json = fs::read_to_string(path).map_err(|source| DiscoveryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    TourDefinition::from_json(&json).map_err(|source| DiscoveryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `path` relative to `root`, with `/` separators on every platform.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
