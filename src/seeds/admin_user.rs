use std::env;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::app::db::{self, organizations::NewOrganization, NewUser, UserChanges};
use crate::app::domain::{Email, OrganizationId, UserId};
use crate::seeds::{Seed, SeedOutcome};

/// Creates a user for `SEED_ADMIN_EMAIL` in the first root organization,
/// creating an "Admin" root if the database has none.
pub struct AdminUser;

#[async_trait]
impl Seed for AdminUser {
    fn version(&self) -> i64 {
        20260301120000
    }

    fn name(&self) -> &'static str {
        "admin_user"
    }

    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, sqlx::Error> {
        let email = match env::var("SEED_ADMIN_EMAIL") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => return Ok(SeedOutcome::Skipped("SEED_ADMIN_EMAIL is not set")),
        };
        let email = match Email::new(email) {
            Ok(e) => e,
            Err(_) => return Ok(SeedOutcome::Skipped("SEED_ADMIN_EMAIL is not a valid email")),
        };
        if let Some(existing) = db::find_by_email(pool, &email).await? {
            let promote = UserChanges {
                is_admin: Some(true),
                ..Default::default()
            };
            db::users::update(pool, &existing.id, &promote).await?;
            return Ok(SeedOutcome::Applied);
        }

        let mut tx = pool.begin().await?;

        let organization_id = match db::organizations::list_roots(&mut *tx).await?.into_iter().next() {
            Some(root) => db::decode_id(OrganizationId::from_string(&root.id))?,
            None => {
                let id = OrganizationId::new();
                db::organizations::insert(
                    &mut *tx,
                    &NewOrganization {
                        id: id.clone(),
                        parent_id: None,
                        name: "Admin".to_string(),
                        description: None,
                        ai_guidelines: None,
                    },
                )
                .await?;
                id
            }
        };

        let name = email
            .as_str()
            .split('@')
            .next()
            .unwrap_or("admin")
            .to_string();
        let new_user = NewUser {
            id: UserId::new(),
            organization_id,
            name,
            email: email.clone(),
            job_function: Some("Administrator".to_string()),
            is_leader: true,
            is_admin: true,
        };
        db::users::insert(&mut *tx, &new_user).await?;
        tx.commit().await?;

        tracing::info!(email = email.as_str(), user_id = %new_user.id.as_str(), "admin user created");
        Ok(SeedOutcome::Applied)
    }
}
