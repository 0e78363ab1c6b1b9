//! Interactive stdin prompts run before the TUI starts.

use super::{Config, Workspace};
use crate::data::Organization;
use anyhow::{bail, Context, Result};
use std::future::Future;
use std::io::{BufRead, Write};
use std::path::Path;

const LINEAR_API_KEYS_URL: &str = "https://linear.app/settings/account/security";

/// Line-based question/answer channel.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    open_browser: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            open_browser: true,
        }
    }

    /// Never launch a browser (for non-interactive use).
    pub fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            bail!("input closed");
        }
        Ok(line.trim().to_string())
    }
}

/// Result of the startup workspace picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceChoice {
    Existing(Workspace),
    AddNew,
}

/// Numbered picker over configured workspaces plus "add new".
pub fn select_workspace<R: BufRead, W: Write>(
    config: &Config,
    prompter: &mut Prompter<R, W>,
) -> Result<WorkspaceChoice> {
    prompter.say("Select a Linear workspace for this directory:")?;
    for (i, workspace) in config.workspaces.iter().enumerate() {
        prompter.say(&format!("  {}. {}", i + 1, workspace.name))?;
    }
    let add_new = config.workspaces.len() + 1;
    prompter.say(&format!("  {add_new}. + Add new workspace"))?;

    loop {
        let answer = prompter.ask(&format!("Choice [1-{add_new}]: "))?;
        match answer.parse::<usize>() {
            Ok(n) if n == add_new => return Ok(WorkspaceChoice::AddNew),
            Ok(n) if (1..add_new).contains(&n) => {
                return Ok(WorkspaceChoice::Existing(config.workspaces[n - 1].clone()))
            }
            _ if answer.is_empty() && config.workspaces.is_empty() => {
                return Ok(WorkspaceChoice::AddNew)
            }
            _ => prompter.say("Invalid choice.")?,
        }
    }
}

/// Walk the user through creating an API key and register the workspace it belongs to.
///
/// `validate` resolves the key to its organization. The workspace is upserted
/// and mapped to `current_dir`; saving is left to the caller.
pub async fn prompt_new_workspace<R, W, F, Fut>(
    config: &mut Config,
    current_dir: &Path,
    prompter: &mut Prompter<R, W>,
    validate: F,
) -> Result<Workspace>
where
    R: BufRead,
    W: Write,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Organization>>,
{
    prompter.say("")?;
    prompter.say("To create an API key:")?;
    prompter.say("  1. Under 'API keys', click 'Create key'")?;
    prompter.say("  2. Give it a label (e.g., 'linc')")?;
    prompter.say("  3. Copy the key and paste it below")?;
    prompter.say("")?;
    prompter.say("Note: This will open your current workspace's settings.")?;
    prompter.say("      Switch workspaces in Linear first if needed.")?;
    prompter.say("")?;
    prompter.ask("Press Enter to open Linear settings in your browser...")?;

    if prompter.open_browser {
        if let Err(e) = crate::util::open_url(LINEAR_API_KEYS_URL) {
            tracing::debug!("Could not open browser: {}", e);
            prompter.say(&format!("Open {LINEAR_API_KEYS_URL} to create a key."))?;
        }
    }

    prompter.say("")?;
    let key = prompter.ask("Paste your API key: ")?;
    if key.is_empty() {
        bail!("no API key provided");
    }

    if !key.starts_with("lin_api_") {
        prompter.say("")?;
        prompter.say(
            "Warning: Key doesn't start with 'lin_api_' - this may not be a valid Linear API key.",
        )?;
        let confirm = prompter.ask("Continue anyway? [y/N]: ")?.to_lowercase();
        if confirm != "y" && confirm != "yes" {
            bail!("authentication cancelled");
        }
    }

    prompter.say("")?;
    prompter.say("Validating API key...")?;
    let org = validate(key.clone())
        .await
        .context("failed to validate API key")?;

    let workspace = match config.workspace_by_id(&org.id) {
        Some(existing) => {
            let mut updated = existing.clone();
            updated.api_key = key;
            prompter.say(&format!(
                "Updated API key for workspace '{}'.\n",
                updated.name
            ))?;
            updated
        }
        None => {
            let workspace = Workspace {
                id: org.id,
                name: org.name,
                api_key: key,
                default_team_id: None,
            };
            prompter.say(&format!(
                "Added workspace '{}' for this directory.\n",
                workspace.name
            ))?;
            workspace
        }
    };

    config.upsert_workspace(workspace.clone());
    config.set_directory_workspace(current_dir, &workspace.id)?;
    tracing::info!("Registered workspace {}", workspace.id);
    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()).without_browser()
    }

    fn org() -> Organization {
        Organization {
            id: "org-1".to_string(),
            name: "Acme".to_string(),
        }
    }

    #[tokio::test]
    async fn test_new_workspace_is_added_and_mapped() {
        let mut config = Config::default();
        let mut p = prompter("\nlin_api_abc\n");

        let ws = prompt_new_workspace(&mut config, Path::new("/code/acme"), &mut p, |key| async move {
            assert_eq!(key, "lin_api_abc");
            Ok(org())
        })
        .await
        .unwrap();

        assert_eq!(ws.name, "Acme");
        assert_eq!(config.workspaces, vec![ws.clone()]);
        assert_eq!(config.directories["/code/acme"], "org-1");
    }

    #[tokio::test]
    async fn test_existing_workspace_gets_new_key() {
        let mut config = Config::default();
        config.upsert_workspace(Workspace {
            id: "org-1".to_string(),
            name: "Acme (old)".to_string(),
            api_key: "lin_api_old".to_string(),
            default_team_id: Some("team".to_string()),
        });
        let mut p = prompter("\nlin_api_new\n");

        let ws = prompt_new_workspace(&mut config, Path::new("/code"), &mut p, |_| async {
            Ok(org())
        })
        .await
        .unwrap();

        assert_eq!(ws.api_key, "lin_api_new");
        assert_eq!(ws.default_team_id.as_deref(), Some("team"));
        assert_eq!(config.workspaces.len(), 1);
    }

    #[tokio::test]
    async fn test_unprefixed_key_requires_confirmation() {
        let mut config = Config::default();
        let mut p = prompter("\nsomething\nn\n");

        let err = prompt_new_workspace(&mut config, Path::new("/code"), &mut p, |_| async {
            Ok(org())
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "authentication cancelled");
        assert!(config.workspaces.is_empty());
    }

    #[test]
    fn test_select_workspace_retries_invalid_input() {
        let mut config = Config::default();
        config.upsert_workspace(Workspace {
            id: "a".to_string(),
            name: "Alpha".to_string(),
            api_key: "lin_api_a".to_string(),
            default_team_id: None,
        });
        let mut p = prompter("9\n1\n");
        match select_workspace(&config, &mut p).unwrap() {
            WorkspaceChoice::Existing(ws) => assert_eq!(ws.id, "a"),
            other => panic!("unexpected choice {other:?}"),
        }

        let mut p = prompter("2\n");
        assert_eq!(select_workspace(&config, &mut p).unwrap(), WorkspaceChoice::AddNew);
    }
}
