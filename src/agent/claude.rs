use super::{build_prompt, Provider};
use crate::data::{Issue, IssueContext};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Launches the `claude` CLI with the issue prompt.
pub struct ClaudeProvider;

fn find_on_path(binary: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}

pub(crate) fn claude_args(prompt: String, plan_mode: bool) -> Vec<String> {
    let mut args = vec![prompt];
    if plan_mode {
        args.push("--permission-mode".to_string());
        args.push("plan".to_string());
    }
    args
}

#[cfg(unix)]
fn replace_process(binary: &Path, args: &[String]) -> Result<()> {
    use std::os::unix::process::CommandExt;
    // exec only returns on failure
    let err = Command::new(binary).args(args).exec();
    Err(err).with_context(|| format!("Failed to exec {}", binary.display()))
}

#[cfg(not(unix))]
fn replace_process(binary: &Path, args: &[String]) -> Result<()> {
    let status = Command::new(binary)
        .args(args)
        .status()
        .with_context(|| format!("Failed to start {}", binary.display()))?;
    if !status.success() {
        anyhow::bail!("claude exited with {}", status);
    }
    Ok(())
}

impl Provider for ClaudeProvider {
    fn name(&self) -> &str {
        "Claude Code"
    }

    fn launch(
        &self,
        issue: &Issue,
        comment: &str,
        context: Option<&IssueContext>,
        plan_mode: bool,
    ) -> Result<()> {
        let prompt = build_prompt(issue, comment, context);
        let binary = find_on_path("claude").context("claude not found in PATH")?;
        tracing::info!("Launching {} for {}", binary.display(), issue.identifier);
        replace_process(&binary, &claude_args(prompt, plan_mode))
    }
}
