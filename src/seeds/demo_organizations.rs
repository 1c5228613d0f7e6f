use std::env;

use async_trait::async_trait;
use sqlx::SqlitePool;
use ulid::Ulid;

use crate::app::db::{self, goals::NewGoal, organizations::NewOrganization, NewUser};
use crate::app::domain::{Email, GoalStatus, GoalVisibility, OrganizationId, UserId};
use crate::seeds::{Seed, SeedOutcome};

struct DemoOrg {
    key: &'static str,
    parent: Option<&'static str>,
    name: &'static str,
    description: &'static str,
    ai_guidelines: Option<&'static str>,
    leader: (&'static str, &'static str, &'static str),
}

struct DemoGoal {
    org: &'static str,
    title: &'static str,
    key_results: &'static [&'static str],
    status: GoalStatus,
    progress: i64,
    visibility: GoalVisibility,
}

const ORGS: &[DemoOrg] = &[
    DemoOrg {
        key: "acme",
        parent: None,
        name: "Acme",
        description: "The whole company.",
        ai_guidelines: Some("Tie every recommendation back to customer retention."),
        leader: ("Alex Rivera", "alex@acme.test", "CEO"),
    },
    DemoOrg {
        key: "engineering",
        parent: Some("acme"),
        name: "Engineering",
        description: "Builds and runs the product.",
        ai_guidelines: Some("Prefer incremental delivery over big-bang rewrites."),
        leader: ("Jordan Lee", "jordan@acme.test", "VP Engineering"),
    },
    DemoOrg {
        key: "product",
        parent: Some("acme"),
        name: "Product",
        description: "Decides what to build next.",
        ai_guidelines: None,
        leader: ("Sam Patel", "sam@acme.test", "Head of Product"),
    },
    DemoOrg {
        key: "sales",
        parent: Some("acme"),
        name: "Sales",
        description: "Brings in new customers.",
        ai_guidelines: None,
        leader: ("Morgan Diaz", "morgan@acme.test", "Head of Sales"),
    },
    DemoOrg {
        key: "platform",
        parent: Some("engineering"),
        name: "Platform",
        description: "Shared infrastructure and developer tooling.",
        ai_guidelines: None,
        leader: ("Casey Kim", "casey@acme.test", "Engineering Manager"),
    },
    DemoOrg {
        key: "qa",
        parent: Some("engineering"),
        name: "QA",
        description: "Release quality.",
        ai_guidelines: None,
        leader: ("Riley Chen", "riley@acme.test", "QA Lead"),
    },
    DemoOrg {
        key: "ux",
        parent: Some("product"),
        name: "UX",
        description: "Research and design.",
        ai_guidelines: None,
        leader: ("Taylor Brooks", "taylor@acme.test", "Design Lead"),
    },
];

const GOALS: &[DemoGoal] = &[
    DemoGoal {
        org: "acme",
        title: "Grow net revenue retention to 115%",
        key_results: &["Cut logo churn below 5%", "Expansion revenue +20%"],
        status: GoalStatus::InProgress,
        progress: 35,
        visibility: GoalVisibility::Public,
    },
    DemoGoal {
        org: "engineering",
        title: "Ship the v2 platform",
        key_results: &["p99 latency under 200ms", "Zero Sev1 incidents in Q3"],
        status: GoalStatus::InProgress,
        progress: 50,
        visibility: GoalVisibility::Public,
    },
    DemoGoal {
        org: "engineering",
        title: "Reorganize on-call rotations",
        key_results: &[],
        status: GoalStatus::NotStarted,
        progress: 0,
        visibility: GoalVisibility::Private,
    },
    DemoGoal {
        org: "product",
        title: "Launch self-serve onboarding",
        key_results: &["Time to first value under 10 minutes"],
        status: GoalStatus::InProgress,
        progress: 20,
        visibility: GoalVisibility::TeamOnly,
    },
    DemoGoal {
        org: "platform",
        title: "Migrate CI to ephemeral runners",
        key_results: &["Median build under 8 minutes"],
        status: GoalStatus::Completed,
        progress: 100,
        visibility: GoalVisibility::Public,
    },
    DemoGoal {
        org: "sales",
        title: "Close three enterprise pilots",
        key_results: &[],
        status: GoalStatus::InProgress,
        progress: 66,
        visibility: GoalVisibility::Public,
    },
];

/// Demo Acme organization tree with one leader per team and a few goals.
/// Runs only when `SEED_DEMO=1`.
pub struct DemoOrganizations;

#[async_trait]
impl Seed for DemoOrganizations {
    fn version(&self) -> i64 {
        20260301110000
    }

    fn name(&self) -> &'static str {
        "demo_organizations"
    }

    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, sqlx::Error> {
        if env::var("SEED_DEMO").map(|v| v.trim() != "1").unwrap_or(true) {
            return Ok(SeedOutcome::Skipped("SEED_DEMO is not 1"));
        }

        let mut tx = pool.begin().await?;
        let mut ids: Vec<(&'static str, OrganizationId)> = Vec::new();
        let mut leaders: Vec<(&'static str, UserId)> = Vec::new();

        // ORGS lists parents before children.
        for demo in ORGS {
            let parent_id = demo
                .parent
                .and_then(|p| ids.iter().find(|(k, _)| *k == p))
                .map(|(_, id)| id.clone());
            let id = OrganizationId::new();
            db::organizations::insert(
                &mut *tx,
                &NewOrganization {
                    id: id.clone(),
                    parent_id,
                    name: demo.name.to_string(),
                    description: Some(demo.description.to_string()),
                    ai_guidelines: demo.ai_guidelines.map(str::to_string),
                },
            )
            .await?;

            let (name, email, job) = demo.leader;
            let email = Email::new(email.to_string())
                .map_err(|e| sqlx::Error::Protocol(format!("bad demo email: {e:?}")))?;
            let user_id = UserId::new();
            db::users::insert(
                &mut *tx,
                &NewUser {
                    id: user_id.clone(),
                    organization_id: id.clone(),
                    name: name.to_string(),
                    email,
                    job_function: Some(job.to_string()),
                    is_leader: true,
                    is_admin: false,
                },
            )
            .await?;

            ids.push((demo.key, id));
            leaders.push((demo.key, user_id));
        }

        for demo in GOALS {
            let Some((_, org_id)) = ids.iter().find(|(k, _)| *k == demo.org) else {
                continue;
            };
            let owner_id = leaders
                .iter()
                .find(|(k, _)| *k == demo.org)
                .map(|(_, u)| u.as_str());
            db::goals::insert(
                &mut *tx,
                &NewGoal {
                    id: Ulid::new().to_string(),
                    organization_id: org_id.clone(),
                    owner_id,
                    title: demo.title.to_string(),
                    description: None,
                    key_results: demo.key_results.iter().map(|s| s.to_string()).collect(),
                    status: demo.status,
                    progress: demo.progress,
                    visibility: demo.visibility,
                },
            )
            .await?;
        }

        tx.commit().await?;
        tracing::info!(organizations = ORGS.len(), goals = GOALS.len(), "demo tree seeded");
        Ok(SeedOutcome::Applied)
    }
}
