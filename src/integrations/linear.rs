use crate::data::{
    Attachment, Comment, Cycle, Issue, Label, Organization, Priority, State, StateType, Team,
    User, Viewer,
};
use crate::integrations::{Tracker, HTTP_CLIENT};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const LINEAR_API_URL: &str = "https://api.linear.app/graphql";

const VIEWER_QUERY: &str = r#"
    query Viewer {
        viewer {
            id
            name
            email
            organization { id name }
            teams { nodes { id name key } }
        }
    }
"#;

const TEAM_STATES_QUERY: &str = r#"
    query TeamStates($teamId: String!) {
        team(id: $teamId) {
            states { nodes { id name color type position } }
        }
    }
"#;

const MY_ISSUES_QUERY: &str = r#"
    query AssignedIssues($teamId: ID!) {
        issues(
            filter: {
                team: { id: { eq: $teamId } }
                assignee: { isMe: { eq: true } }
                state: { type: { nin: ["completed"] } }
            }
            orderBy: updatedAt
            first: 50
        ) {
            nodes { ...IssueFields }
        }
    }
"#;

const ALL_TEAM_ISSUES_QUERY: &str = r#"
    query AllTeamIssues($teamId: ID!) {
        issues(
            filter: {
                team: { id: { eq: $teamId } }
                state: { type: { nin: ["completed"] } }
            }
            orderBy: updatedAt
            first: 100
        ) {
            nodes { ...IssueFields }
        }
    }
"#;

const ISSUE_FIELDS: &str = r#"
    fragment IssueFields on Issue {
        id
        identifier
        title
        description
        priority
        estimate
        branchName
        url
        createdAt
        state { id name color type position }
        assignee { id name email }
        labels { nodes { id name color } }
        cycle { id number name }
        team { id name key }
    }
"#;

const ISSUE_WITH_CONTEXT_QUERY: &str = r#"
    query IssueWithContext($issueId: String!) {
        issue(id: $issueId) {
            ...IssueFields
            comments(first: 20) {
                nodes { id body createdAt user { id name email } }
            }
            attachments(first: 20) {
                nodes { id title url sourceType subtitle metadata createdAt }
            }
        }
    }
"#;

const CREATE_COMMENT_MUTATION: &str = r#"
    mutation CreateComment($issueId: String!, $body: String!) {
        commentCreate(input: { issueId: $issueId, body: $body }) { success }
    }
"#;

const UPDATE_TITLE_MUTATION: &str = r#"
    mutation UpdateIssueTitle($issueId: String!, $title: String!) {
        issueUpdate(id: $issueId, input: { title: $title }) { success }
    }
"#;

const UPDATE_PRIORITY_MUTATION: &str = r#"
    mutation UpdateIssuePriority($issueId: String!, $priority: Int!) {
        issueUpdate(id: $issueId, input: { priority: $priority }) { success }
    }
"#;

const UPDATE_STATE_MUTATION: &str = r#"
    mutation UpdateIssueState($issueId: String!, $stateId: String!) {
        issueUpdate(id: $issueId, input: { stateId: $stateId }) { success }
    }
"#;

// Type-safe API response structures for Linear GraphQL API
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ViewerData {
    viewer: ViewerNode,
}

#[derive(Debug, Deserialize)]
struct ViewerNode {
    id: String,
    name: String,
    #[serde(default)]
    email: String,
    organization: Organization,
    teams: Connection<Team>,
}

#[derive(Debug, Deserialize)]
struct TeamStatesData {
    team: TeamStatesNode,
}

#[derive(Debug, Deserialize)]
struct TeamStatesNode {
    states: Connection<StateNode>,
}

#[derive(Debug, Deserialize)]
struct IssuesData {
    issues: Connection<IssueNode>,
}

#[derive(Debug, Deserialize)]
struct IssueData {
    issue: IssueNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentCreateData {
    comment_create: MutationPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueUpdateData {
    issue_update: MutationPayload,
}

#[derive(Debug, Deserialize)]
struct MutationPayload {
    success: bool,
}

#[derive(Debug, Deserialize)]
struct StateNode {
    id: String,
    name: String,
    #[serde(default)]
    color: String,
    #[serde(rename = "type")]
    state_type: StateType,
    #[serde(default)]
    position: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueNode {
    id: String,
    identifier: String,
    title: String,
    description: Option<String>,
    priority: Option<f64>,
    estimate: Option<f64>,
    branch_name: Option<String>,
    url: String,
    created_at: Option<String>,
    state: StateNode,
    assignee: Option<User>,
    labels: Option<Connection<LabelNode>>,
    cycle: Option<Cycle>,
    team: Team,
    comments: Option<Connection<CommentNode>>,
    attachments: Option<Connection<AttachmentNode>>,
}

#[derive(Debug, Deserialize)]
struct LabelNode {
    id: String,
    name: String,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentNode {
    id: String,
    body: String,
    created_at: String,
    user: Option<User>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentNode {
    id: String,
    title: Option<String>,
    url: String,
    source_type: Option<String>,
    subtitle: Option<String>,
    metadata: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    created_at: String,
}

impl From<StateNode> for State {
    fn from(node: StateNode) -> Self {
        State {
            id: node.id,
            name: node.name,
            color: node.color,
            state_type: node.state_type,
            position: node.position,
        }
    }
}

impl From<IssueNode> for Issue {
    fn from(node: IssueNode) -> Self {
        let labels = node
            .labels
            .map(|l| {
                l.nodes
                    .into_iter()
                    .map(|label| Label {
                        id: label.id,
                        name: label.name,
                        color: label.color.unwrap_or_else(|| "#888888".to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let comments = node
            .comments
            .map(|c| {
                c.nodes
                    .into_iter()
                    .map(|comment| Comment {
                        id: comment.id,
                        body: comment.body,
                        created_at: comment.created_at,
                        user: comment.user.unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let attachments = node
            .attachments
            .map(|a| {
                a.nodes
                    .into_iter()
                    .map(|att| Attachment {
                        id: att.id,
                        title: att.title.unwrap_or_default(),
                        url: att.url,
                        source_type: att.source_type.unwrap_or_default(),
                        subtitle: att.subtitle.unwrap_or_default(),
                        metadata: att.metadata.unwrap_or_default(),
                        created_at: att.created_at,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Issue {
            id: node.id,
            identifier: node.identifier,
            title: node.title,
            description: node.description.unwrap_or_default(),
            priority: Priority::from_int(node.priority.unwrap_or_default() as i64),
            estimate: node.estimate,
            branch_name: node.branch_name.filter(|b| !b.is_empty()),
            url: node.url,
            created_at: node.created_at.and_then(|c| c.parse().ok()),
            state: node.state.into(),
            assignee: node.assignee,
            labels,
            cycle: node.cycle,
            team: node.team,
            comments,
            attachments,
        }
    }
}

/// Linear GraphQL client authenticated with a personal API key.
#[derive(Clone)]
pub struct LinearClient {
    api_key: String,
}

impl LinearClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let response = HTTP_CLIENT
            .post(LINEAR_API_URL)
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await
            .context("Failed to reach Linear API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Linear API request failed with status {}: {}", status, body);
        }

        let body: GraphQLResponse<T> = response
            .json()
            .await
            .context("Failed to decode Linear API response")?;
        decode(body)
    }

    async fn fetch_issues(&self, query: &str, team_id: &str) -> Result<Vec<Issue>> {
        let query = format!("{query}{ISSUE_FIELDS}");
        let data: IssuesData = self
            .execute(&query, serde_json::json!({ "teamId": team_id }))
            .await?;
        Ok(data.issues.nodes.into_iter().map(Issue::from).collect())
    }

    async fn update_issue(&self, query: &str, variables: serde_json::Value) -> Result<()> {
        let data: IssueUpdateData = self.execute(query, variables).await?;
        if !data.issue_update.success {
            bail!("Linear rejected the issue update");
        }
        Ok(())
    }
}

fn decode<T>(body: GraphQLResponse<T>) -> Result<T> {
    if let Some(error) = body.errors.first() {
        bail!("GraphQL error: {}", error.message);
    }
    body.data
        .ok_or_else(|| anyhow!("Linear API response contained no data"))
}

#[async_trait]
impl Tracker for LinearClient {
    async fn viewer(&self) -> Result<Viewer> {
        let data: ViewerData = self.execute(VIEWER_QUERY, serde_json::json!({})).await?;
        let viewer = data.viewer;
        Ok(Viewer {
            id: viewer.id,
            name: viewer.name,
            email: viewer.email,
            organization: viewer.organization,
            teams: viewer.teams.nodes,
        })
    }

    async fn team_states(&self, team_id: &str) -> Result<Vec<State>> {
        let data: TeamStatesData = self
            .execute(TEAM_STATES_QUERY, serde_json::json!({ "teamId": team_id }))
            .await?;
        Ok(data.team.states.nodes.into_iter().map(State::from).collect())
    }

    async fn my_issues(&self, team_id: &str) -> Result<Vec<Issue>> {
        self.fetch_issues(MY_ISSUES_QUERY, team_id).await
    }

    async fn all_team_issues(&self, team_id: &str) -> Result<Vec<Issue>> {
        self.fetch_issues(ALL_TEAM_ISSUES_QUERY, team_id).await
    }

    async fn issue_with_context(&self, issue_id: &str) -> Result<Issue> {
        let query = format!("{ISSUE_WITH_CONTEXT_QUERY}{ISSUE_FIELDS}");
        let data: IssueData = self
            .execute(&query, serde_json::json!({ "issueId": issue_id }))
            .await?;
        Ok(data.issue.into())
    }

    async fn create_comment(&self, issue_id: &str, body: &str) -> Result<()> {
        let data: CommentCreateData = self
            .execute(
                CREATE_COMMENT_MUTATION,
                serde_json::json!({ "issueId": issue_id, "body": body }),
            )
            .await?;
        if !data.comment_create.success {
            bail!("Linear rejected the comment");
        }
        Ok(())
    }

    async fn update_title(&self, issue_id: &str, title: &str) -> Result<()> {
        self.update_issue(
            UPDATE_TITLE_MUTATION,
            serde_json::json!({ "issueId": issue_id, "title": title }),
        )
        .await
    }

    async fn update_priority(&self, issue_id: &str, priority: Priority) -> Result<()> {
        self.update_issue(
            UPDATE_PRIORITY_MUTATION,
            serde_json::json!({ "issueId": issue_id, "priority": priority.as_int() }),
        )
        .await
    }

    async fn update_state(&self, issue_id: &str, state_id: &str) -> Result<()> {
        self.update_issue(
            UPDATE_STATE_MUTATION,
            serde_json::json!({ "issueId": issue_id, "stateId": state_id }),
        )
        .await
    }
}
