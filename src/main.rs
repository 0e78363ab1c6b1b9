use anyhow::{Context, Result};
use clap::Parser;
use linc::agent::{self, LaunchRequest, Registry};
use linc::config::{self, Config, Prompter, Workspace, WorkspaceChoice};
use linc::integrations::git::{self, Git};
use linc::integrations::{LinearClient, Tracker};
use linc::tui::{self, Outcome, Session};
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "linc")]
#[command(about = "Browse Linear issues and hand them off to a coding agent")]
#[command(disable_version_flag = true)]
struct Args {
    /// Print version and exit
    #[arg(short = 'v', long)]
    version: bool,

    /// Path to config file
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("linc {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging();

    let config_path = match args.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let working_dir = std::env::current_dir().context("failed to resolve current directory")?;

    let mut config = config::load(&config_path)?;
    let mut workspace = resolve_workspace(&mut config, &config_path, &working_dir).await?;

    loop {
        let session = Session {
            config: config.clone(),
            config_path: config_path.clone(),
            workspace: workspace.clone(),
            working_dir: working_dir.clone(),
            branch: git::current_branch(&working_dir),
            version: env!("CARGO_PKG_VERSION").to_string(),
            providers: Registry::with_builtin().ids(),
        };

        let (outcome, active) = tui::run(session, Box::new(connect)).await?;
        // The session may have saved provider or default-team changes
        config = config::load(&config_path)?;

        match outcome {
            Outcome::Quit => return Ok(()),
            Outcome::AddWorkspace => {
                let stdin = io::stdin();
                let mut prompter = Prompter::new(stdin.lock(), io::stdout());
                workspace =
                    add_workspace(&mut config, &config_path, &working_dir, &mut prompter).await?;
            }
            Outcome::Launch(request) => {
                return launch(&config, &active, &working_dir, request).await;
            }
        }
    }
}

/// Log to a file in the data directory; the TUI owns the terminal.
fn init_logging() {
    let Some(dirs) = directories::ProjectDirs::from("", "", "linc") else {
        return;
    };
    let dir = dirs.data_dir();
    if fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("linc.log"))
    else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("linc=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn connect(workspace: &Workspace) -> Arc<dyn Tracker> {
    Arc::new(LinearClient::new(workspace.api_key.clone()))
}

/// Workspace for this directory: mapped, picked from the configured ones, or newly added.
async fn resolve_workspace(config: &mut Config, path: &Path, dir: &Path) -> Result<Workspace> {
    if let Some(workspace) = config.workspace_for_directory(dir) {
        tracing::info!("Using workspace {} for {}", workspace.name, dir.display());
        return Ok(workspace.clone());
    }

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    if config.has_workspaces() {
        if let WorkspaceChoice::Existing(workspace) =
            config::select_workspace(config, &mut prompter)?
        {
            config.set_directory_workspace(dir, &workspace.id)?;
            config.save(path)?;
            return Ok(workspace);
        }
    }

    add_workspace(config, path, dir, &mut prompter).await
}

async fn add_workspace<R: BufRead, W: Write>(
    config: &mut Config,
    path: &Path,
    dir: &Path,
    prompter: &mut Prompter<R, W>,
) -> Result<Workspace> {
    let workspace = config::prompt_new_workspace(config, dir, prompter, |key| async move {
        LinearClient::new(key).organization().await
    })
    .await?;
    config.save(path)?;
    tracing::info!("Added workspace {}", workspace.name);
    Ok(workspace)
}

/// Prepare the issue and branch, then hand the terminal to the configured agent.
async fn launch(
    config: &Config,
    workspace: &Workspace,
    dir: &Path,
    request: LaunchRequest,
) -> Result<()> {
    let tracker = LinearClient::new(workspace.api_key.clone());
    let vcs = Git::new(dir);
    let mut stdout = io::stdout();

    let Some(handoff) = agent::prepare(&tracker, &vcs, &request, &mut stdout).await? else {
        return Ok(());
    };

    let registry = Registry::with_builtin();
    let provider = registry.get(config.provider())?;
    tracing::info!(
        "Launching {} for {}",
        provider.name(),
        handoff.issue.identifier
    );
    provider
        .launch(
            &handoff.issue,
            &request.comment,
            handoff.context.as_ref(),
            request.plan_mode,
        )
        .with_context(|| format!("failed to launch {}", provider.name()))
}
