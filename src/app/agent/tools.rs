use std::collections::HashMap;

use serde::Serialize;
use ulid::Ulid;

use super::{Caller, ToolError};
use crate::app::{
    db::{self, comments::NewComment, goals::Goal},
    domain::{CommentKind, CommentStatus, GoalStatus, Organization, OrganizationId},
    rbac::{Action, SharedOrgStore},
    AppState,
};

/// Longest question text accepted, in characters.
pub const MAX_QUESTION_LEN: usize = 5000;

#[derive(Debug, Clone, Serialize)]
pub struct OrgRef {
    pub id: String,
    pub name: String,
}

impl From<&Organization> for OrgRef {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id.as_str(),
            name: org.name.clone(),
        }
    }
}

/// A goal as presented to the agent, with key results decoded.
#[derive(Debug, Clone, Serialize)]
pub struct GoalSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub key_results: Vec<String>,
    pub status: GoalStatus,
    pub progress: i64,
}

impl From<&Goal> for GoalSummary {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id.clone(),
            title: goal.title.clone(),
            description: goal.description.clone(),
            key_results: goal.key_results_list(),
            status: goal.status,
            progress: goal.progress,
        }
    }
}

/// Goals of one ancestor organization.
#[derive(Debug, Clone, Serialize)]
pub struct ParentGoals {
    pub organization: OrgRef,
    pub goals: Vec<GoalSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollaboratorGoal {
    #[serde(flatten)]
    pub goal: GoalSummary,
    pub organization: OrgRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmittedQuestion {
    pub comment_id: String,
    pub goal_id: String,
    pub question: String,
    pub status: CommentStatus,
}

/// Whether `caller` may see `goal`: always inside its own org, otherwise only
/// non-private goals.
fn visible_to(caller_org: &OrganizationId, goal: &Goal) -> bool {
    goal.organization_id == caller_org.as_str() || goal.visibility.visible_outside_owner()
}

/// Goals of every ancestor of `org_id`, grouped per ancestor from the root down.
/// `org_id` itself is excluded; a root organization yields an empty list.
pub async fn get_parent_goals(
    state: &AppState,
    caller: &Caller,
    org_id: &str,
) -> Result<Vec<ParentGoals>, ToolError> {
    let not_found = || ToolError::OrganizationNotFound(org_id.to_string());
    let id = OrganizationId::from_string(org_id).map_err(|_| not_found())?;

    let mut path = state.orgs.get_path(&id).await?;
    if path.pop().is_none() {
        return Err(not_found());
    }
    parent_goals_along(state, caller, &path).await
}

/// Shared by [`get_parent_goals`] and the user context: `ancestors` is a
/// root-first path that excludes the org the goals are gathered for.
pub(super) async fn parent_goals_along(
    state: &AppState,
    caller: &Caller,
    ancestors: &[Organization],
) -> Result<Vec<ParentGoals>, ToolError> {
    if ancestors.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<OrganizationId> = ancestors.iter().map(|o| o.id.clone()).collect();
    let goals = db::goals::find_by_organizations(&state.db, &ids).await?;

    let mut by_org: HashMap<String, Vec<GoalSummary>> = HashMap::new();
    for goal in goals.iter().filter(|g| visible_to(&caller.organization_id, g)) {
        by_org
            .entry(goal.organization_id.clone())
            .or_default()
            .push(GoalSummary::from(goal));
    }

    Ok(ancestors
        .iter()
        .map(|org| ParentGoals {
            organization: OrgRef::from(org),
            goals: by_org.remove(&org.id.as_str()).unwrap_or_default(),
        })
        .collect())
}

/// Keyword search across the caller's access scope (own org, ancestors,
/// siblings). Private goals outside the caller's own org are dropped.
pub async fn search_collaborator_goals(
    state: &AppState,
    caller: &Caller,
    keyword: &str,
) -> Result<Vec<CollaboratorGoal>, ToolError> {
    let scope = state.scope.accessible_org_ids(&caller.organization_id).await?;
    if scope.is_empty() {
        return Ok(Vec::new());
    }

    let scope: Vec<OrganizationId> = scope.into_iter().collect();
    let goals = db::goals::search(&state.db, keyword, &scope).await?;

    let mut names = OrgNames::new(&state.orgs);
    let mut results = Vec::new();
    for goal in goals.iter().filter(|g| visible_to(&caller.organization_id, g)) {
        let organization = names.lookup(&goal.organization_id).await?;
        results.push(CollaboratorGoal {
            goal: GoalSummary::from(goal),
            organization,
        });
    }
    Ok(results)
}

/// Raise a question on a goal. Goals the caller cannot read are reported as
/// missing. Otherwise allowed when the caller's org relationship to the goal's
/// org grants `comment:submit_question`; a denial names that relationship.
pub async fn submit_question(
    state: &AppState,
    caller: &Caller,
    goal_id: &str,
    question: &str,
) -> Result<SubmittedQuestion, ToolError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ToolError::Validation("Question must not be empty.".to_string()));
    }
    if question.chars().count() > MAX_QUESTION_LEN {
        return Err(ToolError::Validation(format!(
            "Question must be at most {MAX_QUESTION_LEN} characters."
        )));
    }

    let goal = db::goals::find_by_id(&state.db, goal_id)
        .await?
        .ok_or_else(|| ToolError::GoalNotFound(goal_id.to_string()))?;
    let goal_org_id = goal.organization_id()?;

    let readable = state
        .gate
        .decide_goal(&caller.organization_id, &goal_org_id, goal.visibility, Action::GoalRead)
        .await?;
    if !readable.allowed {
        return Err(ToolError::GoalNotFound(goal_id.to_string()));
    }

    let decision = state
        .gate
        .decide(&caller.organization_id, &goal_org_id, Action::CommentSubmitQuestion)
        .await?;
    if !decision.allowed {
        tracing::debug!(
            user_id = %caller.user.id,
            goal_id,
            relationship = %decision.relationship,
            "agent question denied"
        );
        return Err(ToolError::PermissionDenied {
            relationship: decision.relationship,
        });
    }

    let kind = CommentKind::Question;
    let comment = NewComment {
        id: Ulid::new().to_string(),
        goal_id: goal.id.clone(),
        author_id: caller.user.id.clone(),
        content: question.to_string(),
        kind,
        status: kind.initial_status(),
    };
    db::comments::insert(&state.db, &comment).await?;

    Ok(SubmittedQuestion {
        comment_id: comment.id,
        goal_id: comment.goal_id,
        question: comment.content,
        status: comment.status,
    })
}

/// Memoized organization names for result labelling.
struct OrgNames<'a> {
    store: &'a SharedOrgStore,
    cache: HashMap<String, OrgRef>,
}

impl<'a> OrgNames<'a> {
    fn new(store: &'a SharedOrgStore) -> Self {
        Self {
            store,
            cache: HashMap::new(),
        }
    }

    async fn lookup(&mut self, org_id: &str) -> Result<OrgRef, ToolError> {
        if let Some(found) = self.cache.get(org_id) {
            return Ok(found.clone());
        }
        let org = match OrganizationId::from_string(org_id) {
            Ok(id) => self.store.get_by_id(&id).await?,
            Err(_) => None,
        };
        let org_ref = match org {
            Some(org) => OrgRef::from(&org),
            None => OrgRef {
                id: org_id.to_string(),
                name: "Unknown".to_string(),
            },
        };
        self.cache.insert(org_id.to_string(), org_ref.clone());
        Ok(org_ref)
    }
}
