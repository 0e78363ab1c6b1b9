//! Local git helpers: current branch lookup and branch checkout.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// How a checkout was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkout {
    /// The branch already existed locally.
    Existing,
    /// A local branch was created tracking `origin/<branch>`.
    FromRemote,
    /// A new local branch was created from HEAD.
    Created,
}

/// Version control operations the hand-off needs.
pub trait Vcs {
    fn checkout(&self, branch: &str) -> Result<Checkout>;
}

/// Git CLI run inside a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    dir: PathBuf,
}

impl Git {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn succeeds(&self, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(())
    }
}

impl Vcs for Git {
    fn checkout(&self, branch: &str) -> Result<Checkout> {
        if self.succeeds(&["rev-parse", "--verify", branch]) {
            self.run(&["checkout", branch])?;
            return Ok(Checkout::Existing);
        }

        let remote = format!("origin/{branch}");
        if self.succeeds(&["rev-parse", "--verify", &remote]) {
            self.run(&["checkout", "-b", branch, "--track", &remote])?;
            return Ok(Checkout::FromRemote);
        }

        self.run(&["checkout", "-b", branch])?;
        Ok(Checkout::Created)
    }
}

/// Name of the branch checked out in `dir`, or `None` outside a repository.
pub fn current_branch(dir: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(dir)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }
    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!branch.is_empty()).then_some(branch)
}
