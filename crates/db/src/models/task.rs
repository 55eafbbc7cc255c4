use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    OnHold,
    Done,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub parent_task_id: Option<i64>,
    pub name: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Task row joined with its project and client names for the list view.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct TaskWithContext {
    #[serde(flatten)]
    #[sqlx(flatten)]
    #[ts(flatten)]
    pub task: Task,
    pub project_name: Option<String>,
    pub client_name: Option<String>,
}

impl std::ops::Deref for TaskWithContext {
    type Target = Task;
    fn deref(&self) -> &Self::Target {
        &self.task
    }
}

/// Slim projection consumed by the mindmap hierarchy builder.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, TS)]
pub struct TaskSummary {
    pub id: i64,
    pub project_id: i64,
    pub parent_task_id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTask {
    pub project_id: i64,
    pub name: String,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub parent_task_id: Option<i64>,
}

/// Nullable columns use a double `Option` so a request body can distinguish
/// "leave unchanged" (absent) from "clear" (explicit null).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateTask {
    pub project_id: Option<i64>,
    pub name: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub parent_task_id: Option<Option<i64>>,
}

const TASK_WITH_CONTEXT_COLUMNS: &str = r#"
    t.id, t.project_id, t.parent_task_id, t.name, t.status, t.due_date, t.created_at,
    p.name AS project_name,
    c.name AS client_name
"#;

impl Task {
    pub async fn create(pool: &SqlitePool, data: &CreateTask) -> Result<Self, sqlx::Error> {
        let status = data.status.clone().unwrap_or_default();
        sqlx::query_as::<_, Task>(
            r#"INSERT INTO tasks (project_id, parent_task_id, name, status, due_date)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, project_id, parent_task_id, name, status, due_date, created_at"#,
        )
        .bind(data.project_id)
        .bind(data.parent_task_id)
        .bind(&data.name)
        .bind(status)
        .bind(data.due_date)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"SELECT id, project_id, parent_task_id, name, status, due_date, created_at
               FROM tasks
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Due soonest first; tasks with no due date sort to the end.
    pub async fn find_all_with_context(
        pool: &SqlitePool,
    ) -> Result<Vec<TaskWithContext>, sqlx::Error> {
        sqlx::query_as::<_, TaskWithContext>(&format!(
            r#"SELECT {TASK_WITH_CONTEXT_COLUMNS}
               FROM tasks t
               LEFT JOIN projects p ON p.id = t.project_id
               LEFT JOIN clients c ON c.id = p.client_id
               ORDER BY (t.due_date IS NULL) ASC, t.due_date ASC, t.id ASC"#
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_project_id_with_context(
        pool: &SqlitePool,
        project_id: i64,
    ) -> Result<Vec<TaskWithContext>, sqlx::Error> {
        sqlx::query_as::<_, TaskWithContext>(&format!(
            r#"SELECT {TASK_WITH_CONTEXT_COLUMNS}
               FROM tasks t
               LEFT JOIN projects p ON p.id = t.project_id
               LEFT JOIN clients c ON c.id = p.client_id
               WHERE t.project_id = $1
               ORDER BY (t.due_date IS NULL) ASC, t.due_date ASC, t.id ASC"#
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(existing) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let project_id = data.project_id.unwrap_or(existing.project_id);
        let name = data.name.clone().unwrap_or(existing.name);
        let status = data.status.clone().unwrap_or(existing.status);
        let due_date = data.due_date.unwrap_or(existing.due_date);
        let parent_task_id = data.parent_task_id.unwrap_or(existing.parent_task_id);
        sqlx::query_as::<_, Task>(
            r#"UPDATE tasks
               SET project_id = $2, parent_task_id = $3, name = $4, status = $5, due_date = $6
               WHERE id = $1
               RETURNING id, project_id, parent_task_id, name, status, due_date, created_at"#,
        )
        .bind(id)
        .bind(project_id)
        .bind(parent_task_id)
        .bind(name)
        .bind(status)
        .bind(due_date)
        .fetch_optional(pool)
        .await
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: i64,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"UPDATE tasks
               SET status = $2
               WHERE id = $1
               RETURNING id, project_id, parent_task_id, name, status, due_date, created_at"#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn summaries(pool: &SqlitePool) -> Result<Vec<TaskSummary>, sqlx::Error> {
        sqlx::query_as::<_, TaskSummary>(
            r#"SELECT id, project_id, parent_task_id, name
               FROM tasks
               ORDER BY id ASC"#,
        )
        .fetch_all(pool)
        .await
    }
}
