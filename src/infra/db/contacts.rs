use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{EntityRepo, RepoError};
use crate::domain::entities::{Contact, ContactDraft};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    query: String,
    email: String,
    contact: String,
    created_at: OffsetDateTime,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            query: row.query,
            email: row.email,
            contact: row.contact,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl EntityRepo<Contact> for PostgresRepositories {
    async fn insert(&self, draft: ContactDraft) -> Result<Contact, RepoError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            INSERT INTO contacts (id, query, email, contact)
            VALUES ($1, $2, $3, $4)
            RETURNING id, query, email, contact, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.query)
        .bind(&draft.email)
        .bind(&draft.contact)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_all(&self) -> Result<Vec<Contact>, RepoError> {
        let rows = sqlx::query_as::<_, ContactRow>(
            "SELECT id, query, email, contact, created_at FROM contacts ORDER BY created_at, id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
