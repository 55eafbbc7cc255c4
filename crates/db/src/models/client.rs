use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Slim projection used by dropdowns and the mindmap snapshot.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, TS)]
pub struct ClientSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateClient {
    pub name: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl Client {
    pub async fn create(pool: &SqlitePool, data: &CreateClient) -> Result<Self, sqlx::Error> {
        let is_active = data.is_active.unwrap_or(true);
        sqlx::query_as::<_, Client>(
            r#"INSERT INTO clients (name, is_active)
               VALUES ($1, $2)
               RETURNING id, name, is_active, created_at"#,
        )
        .bind(&data.name)
        .bind(is_active)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"SELECT id, name, is_active, created_at
               FROM clients
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"SELECT id, name, is_active, created_at
               FROM clients
               ORDER BY name ASC"#,
        )
        .fetch_all(pool)
        .await
    }

    /// Active clients only, for the project and meeting form dropdowns.
    pub async fn find_active(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"SELECT id, name, is_active, created_at
               FROM clients
               WHERE is_active = 1
               ORDER BY name ASC"#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateClient,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(existing) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let name = data.name.clone().unwrap_or(existing.name);
        let is_active = data.is_active.unwrap_or(existing.is_active);
        sqlx::query_as::<_, Client>(
            r#"UPDATE clients
               SET name = $2, is_active = $3
               WHERE id = $1
               RETURNING id, name, is_active, created_at"#,
        )
        .bind(id)
        .bind(name)
        .bind(is_active)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn summaries(pool: &SqlitePool) -> Result<Vec<ClientSummary>, sqlx::Error> {
        sqlx::query_as::<_, ClientSummary>(
            r#"SELECT id, name
               FROM clients
               ORDER BY name ASC"#,
        )
        .fetch_all(pool)
        .await
    }
}
