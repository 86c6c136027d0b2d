use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{EntityRepo, RepoError};
use crate::domain::entities::{Project, ProjectDraft};

use super::{PostgresRepositories, map_sqlx_error};

const PROJECT_COLUMNS: &str = "id, category, description, logo, uiux_images, \
    github_repo_link, deployed_link, created_at";

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    category: Option<String>,
    description: Option<String>,
    logo: Vec<u8>,
    uiux_images: Vec<Vec<u8>>,
    github_repo_link: Option<String>,
    deployed_link: Option<String>,
    created_at: OffsetDateTime,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            description: row.description,
            logo: Bytes::from(row.logo),
            uiux_images: row.uiux_images.into_iter().map(Bytes::from).collect(),
            github_repo_link: row.github_repo_link,
            deployed_link: row.deployed_link,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl EntityRepo<Project> for PostgresRepositories {
    async fn insert(&self, draft: ProjectDraft) -> Result<Project, RepoError> {
        let gallery: Vec<Vec<u8>> = draft
            .uiux_images
            .iter()
            .map(|image| image.to_vec())
            .collect();

        let sql = format!(
            "INSERT INTO projects \
                (id, category, description, logo, uiux_images, github_repo_link, deployed_link) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PROJECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.fields.category)
            .bind(&draft.fields.description)
            .bind(draft.logo.as_ref())
            .bind(gallery)
            .bind(&draft.fields.github_repo_link)
            .bind(&draft.fields.deployed_link)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_all(&self) -> Result<Vec<Project>, RepoError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, ProjectRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
