pub mod wizard;

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub use wizard::{prompt_new_workspace, select_workspace, Prompter, WorkspaceChoice};

/// A tracker workspace the user has authenticated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_team_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
    /// Absolute directory path -> workspace id.
    #[serde(default)]
    pub directories: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

pub fn config_dir() -> Result<PathBuf> {
    let dir = directories::ProjectDirs::from("", "", "linc")
        .context("Could not determine config directory")?
        .config_dir()
        .to_path_buf();
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load the config at `path`. A missing file is an empty config.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    Ok(config)
}

fn absolute(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    Ok(std::env::current_dir()
        .context("Failed to read current directory")?
        .join(dir))
}

impl Config {
    /// Replace the file at `path` as a whole, holding an exclusive lock while writing.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;

        let lock_path = path.with_extension("toml.lock");
        let lock = File::create(&lock_path)
            .with_context(|| format!("Failed to open {}", lock_path.display()))?;
        lock.lock_exclusive()?;

        let content = toml::to_string_pretty(self)?;
        let tmp_path = path.with_extension("toml.tmp");
        let result = write_private(&tmp_path, content.as_bytes())
            .and_then(|()| {
                fs::rename(&tmp_path, path)
                    .with_context(|| format!("Failed to replace {}", path.display()))
            });

        lock.unlock()?;
        tracing::debug!("Saved config to {}", path.display());
        result
    }

    /// Workspace mapped to `dir` or its nearest mapped ancestor.
    pub fn workspace_for_directory(&self, dir: &Path) -> Option<&Workspace> {
        let dir = absolute(dir).ok()?;
        dir.ancestors()
            .find_map(|d| self.directories.get(d.to_string_lossy().as_ref()))
            .and_then(|id| self.workspace_by_id(id))
    }

    /// The ancestor of `dir` (or `dir` itself) that carries a mapping.
    pub fn mapped_directory(&self, dir: &Path) -> Option<PathBuf> {
        let dir = absolute(dir).ok()?;
        dir.ancestors()
            .find(|d| self.directories.contains_key(d.to_string_lossy().as_ref()))
            .map(Path::to_path_buf)
    }

    pub fn workspace_by_id(&self, id: &str) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id == id)
    }

    /// Insert a workspace, replacing one with the same id.
    pub fn upsert_workspace(&mut self, workspace: Workspace) {
        match self.workspaces.iter_mut().find(|w| w.id == workspace.id) {
            Some(existing) => *existing = workspace,
            None => self.workspaces.push(workspace),
        }
    }

    pub fn set_directory_workspace(&mut self, dir: &Path, workspace_id: &str) -> Result<()> {
        let dir = absolute(dir)?;
        self.directories
            .insert(dir.to_string_lossy().into_owned(), workspace_id.to_string());
        Ok(())
    }

    /// Returns false if the workspace is unknown.
    pub fn set_default_team(&mut self, workspace_id: &str, team_id: &str) -> bool {
        match self.workspaces.iter_mut().find(|w| w.id == workspace_id) {
            Some(workspace) => {
                workspace.default_team_id = Some(team_id.to_string());
                true
            }
            None => false,
        }
    }

    pub fn has_workspaces(&self) -> bool {
        !self.workspaces.is_empty()
    }

    /// Selected agent provider id.
    pub fn provider(&self) -> &str {
        self.provider
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(crate::agent::DEFAULT_PROVIDER)
    }

    pub fn set_provider(&mut self, provider: &str) {
        self.provider = Some(provider.to_string());
    }
}

fn write_private(path: &Path, content: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.write_all(content)?;
    file.sync_all()?;
    Ok(())
}
