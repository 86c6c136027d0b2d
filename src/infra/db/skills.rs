use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{EntityRepo, RepoError};
use crate::domain::entities::{Skill, SkillDraft};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SkillRow {
    id: Uuid,
    name: Option<String>,
    icon: Vec<u8>,
    experience: Option<String>,
    duration: Option<String>,
    created_at: OffsetDateTime,
}

impl From<SkillRow> for Skill {
    fn from(row: SkillRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            icon: Bytes::from(row.icon),
            experience: row.experience,
            duration: row.duration,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl EntityRepo<Skill> for PostgresRepositories {
    async fn insert(&self, draft: SkillDraft) -> Result<Skill, RepoError> {
        let row = sqlx::query_as::<_, SkillRow>(
            r#"
            INSERT INTO skills (id, name, icon, experience, duration)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, icon, experience, duration, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.fields.name)
        .bind(draft.icon.as_ref())
        .bind(&draft.fields.experience)
        .bind(&draft.fields.duration)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_all(&self) -> Result<Vec<Skill>, RepoError> {
        let rows = sqlx::query_as::<_, SkillRow>(
            "SELECT id, name, icon, experience, duration, created_at \
             FROM skills ORDER BY created_at, id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Skill::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
