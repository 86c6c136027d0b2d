use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{EntityRepo, RepoError};
use crate::domain::entities::{Review, ReviewDraft};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    text: String,
    name: String,
    rating: f64,
    created_at: OffsetDateTime,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            name: row.name,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl EntityRepo<Review> for PostgresRepositories {
    async fn insert(&self, draft: ReviewDraft) -> Result<Review, RepoError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (id, text, name, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id, text, name, rating, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.text)
        .bind(&draft.name)
        .bind(draft.rating)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_all(&self) -> Result<Vec<Review>, RepoError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, text, name, rating, created_at FROM reviews ORDER BY created_at, id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
