use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    OnHold,
    Done,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Project {
    pub id: i64,
    pub client_id: i64,
    pub name: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

/// Project row joined with its owning client's name for card display.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ProjectWithClient {
    #[serde(flatten)]
    #[sqlx(flatten)]
    #[ts(flatten)]
    pub project: Project,
    pub client_name: Option<String>,
}

impl std::ops::Deref for ProjectWithClient {
    type Target = Project;
    fn deref(&self) -> &Self::Target {
        &self.project
    }
}

/// Slim projection used by the mindmap snapshot.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, TS)]
pub struct ProjectSummary {
    pub id: i64,
    pub client_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProject {
    pub client_id: i64,
    pub name: String,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateProject {
    pub client_id: Option<i64>,
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
}

const PROJECT_WITH_CLIENT_COLUMNS: &str = r#"
    p.id, p.client_id, p.name, p.status, p.created_at,
    c.name AS client_name
"#;

impl Project {
    pub async fn create(pool: &SqlitePool, data: &CreateProject) -> Result<Self, sqlx::Error> {
        let status = data.status.clone().unwrap_or_default();
        sqlx::query_as::<_, Project>(
            r#"INSERT INTO projects (client_id, name, status)
               VALUES ($1, $2, $3)
               RETURNING id, client_id, name, status, created_at"#,
        )
        .bind(data.client_id)
        .bind(&data.name)
        .bind(status)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"SELECT id, client_id, name, status, created_at
               FROM projects
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Newest first, with the owning client's name joined in.
    pub async fn find_all_with_client(
        pool: &SqlitePool,
    ) -> Result<Vec<ProjectWithClient>, sqlx::Error> {
        sqlx::query_as::<_, ProjectWithClient>(&format!(
            r#"SELECT {PROJECT_WITH_CLIENT_COLUMNS}
               FROM projects p
               LEFT JOIN clients c ON c.id = p.client_id
               ORDER BY p.created_at DESC"#
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_client_id_with_client(
        pool: &SqlitePool,
        client_id: i64,
    ) -> Result<Vec<ProjectWithClient>, sqlx::Error> {
        sqlx::query_as::<_, ProjectWithClient>(&format!(
            r#"SELECT {PROJECT_WITH_CLIENT_COLUMNS}
               FROM projects p
               LEFT JOIN clients c ON c.id = p.client_id
               WHERE p.client_id = $1
               ORDER BY p.created_at DESC"#
        ))
        .bind(client_id)
        .fetch_all(pool)
        .await
    }

    /// Projects that are not finished, for the task form dropdown.
    pub async fn find_open_with_client(
        pool: &SqlitePool,
    ) -> Result<Vec<ProjectWithClient>, sqlx::Error> {
        sqlx::query_as::<_, ProjectWithClient>(&format!(
            r#"SELECT {PROJECT_WITH_CLIENT_COLUMNS}
               FROM projects p
               LEFT JOIN clients c ON c.id = p.client_id
               WHERE p.status != $1
               ORDER BY p.name ASC"#
        ))
        .bind(ProjectStatus::Done)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(existing) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let client_id = data.client_id.unwrap_or(existing.client_id);
        let name = data.name.clone().unwrap_or(existing.name);
        let status = data.status.clone().unwrap_or(existing.status);
        sqlx::query_as::<_, Project>(
            r#"UPDATE projects
               SET client_id = $2, name = $3, status = $4
               WHERE id = $1
               RETURNING id, client_id, name, status, created_at"#,
        )
        .bind(id)
        .bind(client_id)
        .bind(name)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn summaries(pool: &SqlitePool) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        sqlx::query_as::<_, ProjectSummary>(
            r#"SELECT id, client_id, name
               FROM projects
               ORDER BY id ASC"#,
        )
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DBService,
        models::client::{Client, CreateClient},
    };

    async fn seed_client(db: &DBService, name: &str) -> Client {
        Client::create(
            &db.pool,
            &CreateClient {
                name: name.to_string(),
                is_active: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_defaults_to_not_started() {
        let db = DBService::new_in_memory().await.unwrap();
        let client = seed_client(&db, "Acme").await;
        let project = Project::create(
            &db.pool,
            &CreateProject {
                client_id: client.id,
                name: "Website".to_string(),
                status: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(project.status, ProjectStatus::NotStarted);
    }

    #[tokio::test]
    async fn list_joins_client_name() {
        let db = DBService::new_in_memory().await.unwrap();
        let client = seed_client(&db, "Acme").await;
        Project::create(
            &db.pool,
            &CreateProject {
                client_id: client.id,
                name: "Website".to_string(),
                status: Some(ProjectStatus::InProgress),
            },
        )
        .await
        .unwrap();

        let projects = Project::find_all_with_client(&db.pool).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].client_name.as_deref(), Some("Acme"));
        assert_eq!(projects[0].status, ProjectStatus::InProgress);
    }

    #[tokio::test]
    async fn open_projects_exclude_done() {
        let db = DBService::new_in_memory().await.unwrap();
        let client = seed_client(&db, "Acme").await;
        for (name, status) in [
            ("Zeta", ProjectStatus::InProgress),
            ("Alpha", ProjectStatus::NotStarted),
            ("Shipped", ProjectStatus::Done),
        ] {
            Project::create(
                &db.pool,
                &CreateProject {
                    client_id: client.id,
                    name: name.to_string(),
                    status: Some(status),
                },
            )
            .await
            .unwrap();
        }

        let open = Project::find_open_with_client(&db.pool).await.unwrap();
        let names: Vec<&str> = open.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[tokio::test]
    async fn status_round_trips_through_text_column() {
        let db = DBService::new_in_memory().await.unwrap();
        let client = seed_client(&db, "Acme").await;
        let created = Project::create(
            &db.pool,
            &CreateProject {
                client_id: client.id,
                name: "Website".to_string(),
                status: Some(ProjectStatus::OnHold),
            },
        )
        .await
        .unwrap();

        let found = Project::find_by_id(&db.pool, created.id).await.unwrap().unwrap();
        assert_eq!(found.status, ProjectStatus::OnHold);
    }
}
