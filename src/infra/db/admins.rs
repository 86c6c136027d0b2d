use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{AdminRepo, RepoError};
use crate::domain::entities::AdminRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct AdminRow {
    id: Uuid,
    email: String,
    password_hash: Option<String>,
    created_at: OffsetDateTime,
}

impl From<AdminRow> for AdminRecord {
    fn from(row: AdminRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AdminRepo for PostgresRepositories {
    async fn first_admin(&self) -> Result<Option<AdminRecord>, RepoError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, password_hash, created_at FROM admins \
             ORDER BY created_at, id LIMIT 1",
        )
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(AdminRecord::from))
    }

    async fn upsert_admin(&self, email: &str) -> Result<AdminRecord, RepoError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            INSERT INTO admins (id, email)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }
}
