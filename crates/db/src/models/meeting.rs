use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// Meeting note attached to a client: a dated title with an optional link to
/// the minutes document and an optional summary.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Meeting {
    pub id: i64,
    pub client_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub file_url: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct MeetingWithClient {
    #[serde(flatten)]
    #[sqlx(flatten)]
    #[ts(flatten)]
    pub meeting: Meeting,
    pub client_name: Option<String>,
}

impl std::ops::Deref for MeetingWithClient {
    type Target = Meeting;
    fn deref(&self) -> &Self::Target {
        &self.meeting
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateMeeting {
    pub client_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub file_url: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateMeeting {
    pub client_id: Option<i64>,
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub file_url: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub summary: Option<Option<String>>,
}

const MEETING_WITH_CLIENT_COLUMNS: &str = r#"
    m.id, m.client_id, m.title, m.date, m.file_url, m.summary, m.created_at,
    c.name AS client_name
"#;

impl Meeting {
    pub async fn create(pool: &SqlitePool, data: &CreateMeeting) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Meeting>(
            r#"INSERT INTO meetings (client_id, title, date, file_url, summary)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, client_id, title, date, file_url, summary, created_at"#,
        )
        .bind(data.client_id)
        .bind(&data.title)
        .bind(data.date)
        .bind(&data.file_url)
        .bind(&data.summary)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Meeting>(
            r#"SELECT id, client_id, title, date, file_url, summary, created_at
               FROM meetings
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Most recent meeting first, optionally narrowed to one client.
    pub async fn find_all_with_client(
        pool: &SqlitePool,
        client_id: Option<i64>,
    ) -> Result<Vec<MeetingWithClient>, sqlx::Error> {
        match client_id {
            Some(client_id) => {
                sqlx::query_as::<_, MeetingWithClient>(&format!(
                    r#"SELECT {MEETING_WITH_CLIENT_COLUMNS}
                       FROM meetings m
                       LEFT JOIN clients c ON c.id = m.client_id
                       WHERE m.client_id = $1
                       ORDER BY m.date DESC, m.id DESC"#
                ))
                .bind(client_id)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MeetingWithClient>(&format!(
                    r#"SELECT {MEETING_WITH_CLIENT_COLUMNS}
                       FROM meetings m
                       LEFT JOIN clients c ON c.id = m.client_id
                       ORDER BY m.date DESC, m.id DESC"#
                ))
                .fetch_all(pool)
                .await
            }
        }
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateMeeting,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(existing) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let client_id = data.client_id.unwrap_or(existing.client_id);
        let title = data.title.clone().unwrap_or(existing.title);
        let date = data.date.unwrap_or(existing.date);
        let file_url = data.file_url.clone().unwrap_or(existing.file_url);
        let summary = data.summary.clone().unwrap_or(existing.summary);
        sqlx::query_as::<_, Meeting>(
            r#"UPDATE meetings
               SET client_id = $2, title = $3, date = $4, file_url = $5, summary = $6
               WHERE id = $1
               RETURNING id, client_id, title, date, file_url, summary, created_at"#,
        )
        .bind(id)
        .bind(client_id)
        .bind(title)
        .bind(date)
        .bind(file_url)
        .bind(summary)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meetings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
