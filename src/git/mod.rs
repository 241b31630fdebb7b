//! Inference of the VCS provider and organization from git remotes

use std::fmt;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GitError, Result};

/// Source-control hosting provider, as named by the CircleCI API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum VcsType {
    #[serde(rename = "GITHUB")]
    #[value(name = "github")]
    GitHub,

    #[serde(rename = "BITBUCKET")]
    #[value(name = "bitbucket")]
    BitBucket,
}

impl fmt::Display for VcsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsType::GitHub => write!(f, "GITHUB"),
            VcsType::BitBucket => write!(f, "BITBUCKET"),
        }
    }
}

// Remote URL shapes recognized, in match order:
//   git@github.com:circleci/api-service.git
//   git@bitbucket.org:dellelce/makefile_sh.git
//   https://github.com/circleci/esxi-api.git
//   https://marcomorain_ci@bitbucket.org/dellelce/makefile_sh.git
// The org capture stops at the next '/', so trailing path segments and the
// '.git' suffix never leak into the organization name.
static SSH_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^git@(github\.com|bitbucket\.org):([^/]+)/").expect("valid ssh remote pattern")
});

static HTTPS_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:[^@/]+@)?(github\.com|bitbucket\.org)/([^/]+)/")
        .expect("valid https remote pattern")
});

/// Map a hostname to its provider.
///
/// Total over the domains the remote patterns can capture; an unknown host is
/// an ordinary `None`, not an invariant violation.
fn provider_for_host(host: &str) -> Option<VcsType> {
    match host {
        "github.com" => Some(VcsType::GitHub),
        "bitbucket.org" => Some(VcsType::BitBucket),
        _ => None,
    }
}

/// Parse a remote URL into a (provider, organization) pair.
///
/// Tries the SSH form first, then the HTTPS form. Pure so it can be tested
/// without a repository on disk.
pub fn parse_remote_url(url: &str) -> Result<(VcsType, String)> {
    let url = url.trim();

    let captures = SSH_REMOTE
        .captures(url)
        .or_else(|| HTTPS_REMOTE.captures(url))
        .ok_or(GitError::UnrecognizedRemote)?;

    let host = &captures[1];
    let org = captures[2].to_string();

    let provider = provider_for_host(host).ok_or(GitError::UnrecognizedRemote)?;

    Ok((provider, org))
}

/// Infer the VCS provider and organization from the `origin` remote of the
/// repository in the current directory.
///
/// Best effort: assumes `origin` points at a GitHub or Bitbucket project.
pub fn infer_organization_from_git_remotes() -> Result<(VcsType, String)> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .map_err(|e| GitError::RemoteLookup(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::RemoteLookup(stderr).into());
    }

    let url = String::from_utf8_lossy(&output.stdout).to_string();
    log::debug!("origin remote url: {}", url.trim());

    parse_remote_url(&url)
}
