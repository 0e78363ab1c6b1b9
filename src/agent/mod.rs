//! Coding-agent providers and the hand-off that precedes launching one.

pub mod claude;
pub mod echo;
pub mod handoff;
pub mod prompt;

use crate::data::{Issue, IssueContext};
use anyhow::{anyhow, Result};
use std::collections::HashMap;

pub use handoff::{prepare, LaunchRequest};
pub use prompt::build_prompt;

pub const DEFAULT_PROVIDER: &str = "claude";

/// Something that can take over from the session with an issue prompt.
pub trait Provider {
    /// Display name.
    fn name(&self) -> &str;

    /// Launch the agent. May replace the current process and never return on success.
    fn launch(
        &self,
        issue: &Issue,
        comment: &str,
        context: Option<&IssueContext>,
        plan_mode: bool,
    ) -> Result<()>;
}

/// Providers by id.
pub struct Registry {
    providers: HashMap<String, Box<dyn Provider>>,
    default_id: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_id: DEFAULT_PROVIDER.to_string(),
        }
    }
}

impl Registry {
    /// Registry with the bundled providers.
    pub fn with_builtin() -> Self {
        let mut registry = Self::default();
        registry.register("claude", Box::new(claude::ClaudeProvider));
        registry.register("echo", Box::new(echo::EchoProvider));
        registry
    }

    pub fn register(&mut self, id: impl Into<String>, provider: Box<dyn Provider>) {
        self.providers.insert(id.into(), provider);
    }

    pub fn get(&self, id: &str) -> Result<&dyn Provider> {
        self.providers
            .get(id)
            .map(|p| p.as_ref())
            .ok_or_else(|| anyhow!("provider not found: {}", id))
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }
}
