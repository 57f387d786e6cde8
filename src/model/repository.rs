//! Repository identity: the name addresses are rooted at.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// The `host/path` name of a repository, e.g. `github.com/acme/widgets`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryIdentity(String);

impl RepositoryIdentity {
    /// Wrap a repository name, trimming surrounding slashes.
    ///
    /// Returns `None` for an empty name.
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let trimmed = name.as_ref().trim().trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Derive the identity from a workspace root URI: host followed by path.
    ///
    /// `git://github.com/acme/widgets?abc123` becomes `github.com/acme/widgets`.
    /// Query and fragment (commit or revision pins) are dropped.
    pub fn from_root_uri(uri: &str) -> Option<Self> {
        let url = Url::parse(uri).ok()?;
        let host = url.host_str()?;
        Self::new(format!("{host}{}", url.path()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
