use std::fmt;

use serde::Serialize;

use super::{
    tools::{parent_goals_along, GoalSummary, ParentGoals},
    Caller, ToolError,
};
use crate::app::{
    db,
    domain::{GoalStatus, Organization},
    AppState,
};

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub job_function: Option<String>,
}

/// AI guidance attached to one organization on the caller's path.
#[derive(Debug, Clone, Serialize)]
pub struct Guideline {
    pub organization: String,
    pub text: String,
}

/// Everything an assistant needs to know about who it is working for.
#[derive(Debug, Clone, Serialize)]
pub struct UserContext {
    pub user: UserProfile,
    pub organization: Organization,
    /// Root first, ending at the user's organization.
    pub org_path: Vec<Organization>,
    pub current_goals: Vec<GoalSummary>,
    pub parent_goals: Vec<ParentGoals>,
    /// Root first. Organizations without guidelines are skipped.
    pub guidelines: Vec<Guideline>,
}

pub async fn build_user_context(state: &AppState, caller: &Caller) -> Result<UserContext, ToolError> {
    let org_path = state.orgs.get_path(&caller.organization_id).await?;
    let organization = match org_path.last() {
        Some(org) => org.clone(),
        None => {
            return Err(ToolError::OrganizationNotFound(
                caller.organization_id.as_str(),
            ))
        }
    };

    let ancestors = &org_path[..org_path.len() - 1];
    let parent_goals = parent_goals_along(state, caller, ancestors).await?;

    let current_goals = db::goals::find_by_organization(&state.db, &caller.organization_id)
        .await?
        .iter()
        .map(GoalSummary::from)
        .collect();

    let guidelines = org_path
        .iter()
        .filter_map(|org| {
            let text = org.ai_guidelines.as_deref()?.trim();
            (!text.is_empty()).then(|| Guideline {
                organization: org.name.clone(),
                text: text.to_string(),
            })
        })
        .collect();

    Ok(UserContext {
        user: UserProfile {
            id: caller.user.id.clone(),
            name: caller.user.name.clone(),
            email: caller.user.email.clone(),
            job_function: caller.user.job_function.clone(),
        },
        organization,
        org_path,
        current_goals,
        parent_goals,
        guidelines,
    })
}

impl UserContext {
    /// Markdown briefing: profile, hierarchy, own goals, ancestor goals, guidelines.
    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## User Profile")?;
        writeln!(f, "- **Name:** {}", self.user.name)?;
        writeln!(f, "- **Email:** {}", self.user.email)?;
        if let Some(role) = &self.user.job_function {
            writeln!(f, "- **Role:** {role}")?;
        }
        writeln!(f)?;

        writeln!(f, "## Organization")?;
        writeln!(f, "- **Current Team:** {}", self.organization.name)?;
        if let Some(description) = &self.organization.description {
            writeln!(f, "- **Description:** {description}")?;
        }
        let hierarchy: Vec<&str> = self.org_path.iter().map(|o| o.name.as_str()).collect();
        writeln!(f, "- **Hierarchy:** {}", hierarchy.join(" → "))?;
        writeln!(f)?;

        if !self.current_goals.is_empty() {
            writeln!(f, "## Current Team Goals")?;
            for goal in &self.current_goals {
                write_goal(f, goal)?;
            }
            writeln!(f)?;
        }

        if self.parent_goals.iter().any(|p| !p.goals.is_empty()) {
            writeln!(f, "## Strategic Context (Parent Goals)")?;
            for group in self.parent_goals.iter().filter(|p| !p.goals.is_empty()) {
                writeln!(f, "\n### {}", group.organization.name)?;
                for goal in &group.goals {
                    write_goal(f, goal)?;
                }
            }
            writeln!(f)?;
        }

        if !self.guidelines.is_empty() {
            writeln!(f, "## AI Guidelines")?;
            writeln!(f, "The following guidelines should inform all recommendations:")?;
            for guideline in &self.guidelines {
                writeln!(f, "\n### {}", guideline.organization)?;
                writeln!(f, "{}", guideline.text)?;
            }
        }

        Ok(())
    }
}

fn write_goal(f: &mut fmt::Formatter<'_>, goal: &GoalSummary) -> fmt::Result {
    writeln!(
        f,
        "- {} **{}** ({}%)",
        status_marker(goal.status),
        goal.title,
        goal.progress
    )?;
    if let Some(description) = &goal.description {
        writeln!(f, "  - {description}")?;
    }
    if !goal.key_results.is_empty() {
        writeln!(f, "  - Key Results:")?;
        for kr in &goal.key_results {
            writeln!(f, "    - {kr}")?;
        }
    }
    Ok(())
}

fn status_marker(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Completed => "✅",
        GoalStatus::InProgress => "🔄",
        GoalStatus::Cancelled => "❌",
        GoalStatus::NotStarted => "⬜",
    }
}
