use super::{build_prompt, Provider};
use crate::data::{Issue, IssueContext};
use anyhow::Result;

/// Prints the prompt instead of launching anything.
pub struct EchoProvider;

pub(crate) fn render(prompt: &str, plan_mode: bool) -> String {
    format!(
        "=== Echo Provider Output ===\nPlan Mode: {plan_mode}\n=== Prompt Start ===\n{prompt}\n=== Prompt End ===\n"
    )
}

impl Provider for EchoProvider {
    fn name(&self) -> &str {
        "Echo (test)"
    }

    fn launch(
        &self,
        issue: &Issue,
        comment: &str,
        context: Option<&IssueContext>,
        plan_mode: bool,
    ) -> Result<()> {
        let prompt = build_prompt(issue, comment, context);
        print!("{}", render(&prompt, plan_mode));
        Ok(())
    }
}
