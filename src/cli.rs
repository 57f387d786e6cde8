//! CLI interface for codetour.
//!
//! Discovers the tours of a workspace checkout and walks them the way a code
//! viewer would: one step at a time, with links to where each neighbour lives.
//!
//! - `codetour list|show|address`: non-interactive, arguments in, text out.
//! - `codetour walk`: a command loop over the navigation engine.
//!
//! Commands that produce addresses need a repository identity; see
//! [`crate::identity`] for how it is resolved.

mod format;
mod walk;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::address::build_address;
use crate::config::Config;
use crate::discovery::discover_tours;
use crate::identity::{RepositoryArgs, resolve_repository};
use crate::model::{RepoTour, RepositoryIdentity};
use crate::registry::TourRegistry;

use format::{format_steps, format_tour_list};

/// Codetour: walk guided tours through a repository.
#[derive(Debug, Parser)]
#[command(name = "codetour", after_long_help = WALK_EXAMPLE)]
pub struct Cli {
    /// Workspace root to discover tours in.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Repository identity addresses are rooted at (e.g. `github.com/acme/widgets`).
    #[arg(long, global = true)]
    repo: Option<String>,

    /// Workspace root URI; the repository is derived from its host and path.
    #[arg(long, global = true, conflicts_with = "repo")]
    root_uri: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

const WALK_EXAMPLE: &str = r"Example: walking a tour
  codetour --repo github.com/acme/widgets list
  codetour --repo github.com/acme/widgets walk
  > start 1
  > next
  > open /github.com/acme/widgets/-/blob/src/lib.rs#L3&tab=codeTour
  > complete";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the tours found in the workspace.
    List,

    /// Show the steps of one tour.
    Show {
        /// Tour number, as printed by `list`.
        tour: String,
    },

    /// Print the address of one step.
    Address {
        /// Tour number, as printed by `list`.
        tour: String,

        /// Step number, starting at 1.
        step: usize,
    },

    /// Walk tours interactively, one command per line on stdin.
    Walk {
        /// Emit publications as JSON lines instead of text.
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();
    let args = RepositoryArgs {
        repo: cli.repo.as_deref(),
        root_uri: cli.root_uri.as_deref(),
    };

    match cli.command {
        Command::List => cmd_list(&cli.root, config),
        Command::Show { ref tour } => {
            // Addresses are a bonus here, not a requirement.
            let repository = resolve_repository(args, config).ok();
            cmd_show(&cli.root, config, tour, repository.as_ref())
        }
        Command::Address { ref tour, step } => {
            let repository = resolve_repository(args, config)?;
            cmd_address(&cli.root, config, tour, step, &repository)
        }
        Command::Walk { json } => {
            let repository = resolve_repository(args, config)?;
            walk::run(cli.root.clone(), config.tour_dirs(), repository, json)
        }
    }
}

fn cmd_list(root: &Path, config: &Config) -> Result<(), String> {
    let registry = load_registry(root, config, None)?;
    println!("{}", format_tour_list(&registry));
    Ok(())
}

fn cmd_show(
    root: &Path,
    config: &Config,
    tour: &str,
    repository: Option<&RepositoryIdentity>,
) -> Result<(), String> {
    let registry = load_registry(root, config, repository.cloned())?;
    let tour = require_tour(&registry, tour)?;
    println!("{}", format_steps(tour, registry.repository()));
    Ok(())
}

fn cmd_address(
    root: &Path,
    config: &Config,
    tour: &str,
    step: usize,
    repository: &RepositoryIdentity,
) -> Result<(), String> {
    let registry = load_registry(root, config, Some(repository.clone()))?;
    let repo_tour = require_tour(&registry, tour)?;

    let found = step
        .checked_sub(1)
        .and_then(|i| repo_tour.step(i))
        .ok_or_else(|| {
            format!(
                "tour '{}' has no step {step} (it has {})",
                repo_tour.tour.title,
                repo_tour.step_count()
            )
        })?;

    let address = build_address(found, repository)
        .map_err(|e| format!("step {step} of '{}': {e}", repo_tour.tour.title))?;
    println!("{address}");
    Ok(())
}

/// Discover tours under `root` into a registry bound to `repository`.
///
/// Unreadable tour files are reported on stderr and skipped.
fn load_registry(
    root: &Path,
    config: &Config,
    repository: Option<RepositoryIdentity>,
) -> Result<TourRegistry, String> {
    let discovery = discover_tours(root, &config.tour_dirs()).map_err(|e| e.to_string())?;
    for skipped in &discovery.skipped {
        eprintln!("skipped: {skipped}");
    }
    Ok(TourRegistry::new(repository, discovery.tours))
}

/// Resolve a 1-based tour number to a tour.
fn require_tour<'a>(registry: &'a TourRegistry, reference: &str) -> Result<&'a RepoTour, String> {
    registry
        .resolve_ordinal(reference)
        .and_then(|index| registry.get(index))
        .ok_or_else(|| match registry.count() {
            0 => "no tours in this workspace".to_string(),
            n => format!("no tour '{reference}': expected a number from 1 to {n}"),
        })
}
