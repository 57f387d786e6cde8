//! Repository identity resolution.
//!
//! Step addresses embed the repository (`/github.com/acme/widgets/-/blob/...`),
//! so every command that plans navigation needs to know which repository the
//! workspace is. Identity is resolved through a chain:
//!
//! 1. `--repo <host/owner/name>`: explicit per-command override
//! 2. `--root-uri <uri>`: the workspace root URI the viewer reports
//! 3. `CODETOUR_REPOSITORY` env var: process/session level
//! 4. `repository` in `~/.codetour/config.toml`: global default

use std::env;

use crate::config::Config;
use crate::model::RepositoryIdentity;

/// Environment variable consulted after the command-line flags.
pub const REPOSITORY_ENV: &str = "CODETOUR_REPOSITORY";

/// Error message shown when no source yields a repository.
pub const REPOSITORY_REQUIRED: &str = "repository required: pass --repo <host/owner/name> \
    or --root-uri <uri>, set CODETOUR_REPOSITORY, or add `repository = \"...\"` \
    to ~/.codetour/config.toml";

/// Explicit sources from the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct RepositoryArgs<'a> {
    pub repo: Option<&'a str>,
    pub root_uri: Option<&'a str>,
}

/// Resolve the workspace repository from the tiered resolution chain.
pub fn resolve_repository(
    args: RepositoryArgs<'_>,
    config: &Config,
) -> Result<RepositoryIdentity, String> {
    resolve_with_env(args, env::var(REPOSITORY_ENV).ok().as_deref(), config)
}

fn resolve_with_env(
    args: RepositoryArgs<'_>,
    from_env: Option<&str>,
    config: &Config,
) -> Result<RepositoryIdentity, String> {
    // 1. Explicit --repo flag. A value that's there but unusable is an error,
    // not a reason to fall through.
    if let Some(repo) = args.repo {
        return RepositoryIdentity::new(repo).ok_or_else(|| format!("invalid --repo: '{repo}'"));
    }

    // 2. --root-uri.
    if let Some(uri) = args.root_uri {
        return RepositoryIdentity::from_root_uri(uri)
            .ok_or_else(|| format!("cannot derive a repository from root URI '{uri}'"));
    }

    // 3. CODETOUR_REPOSITORY.
    if let Some(id) = from_env.and_then(RepositoryIdentity::new) {
        return Ok(id);
    }

    // 4. ~/.codetour/config.toml.
    if let Some(id) = config.repository.as_deref().and_then(RepositoryIdentity::new) {
        return Ok(id);
    }

    Err(REPOSITORY_REQUIRED.to_string())
}
