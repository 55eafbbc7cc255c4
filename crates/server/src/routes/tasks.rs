use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::task::{CreateTask, Task, TaskStatus, TaskWithContext, UpdateTask};
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use services::services::events::{EntityKind, MutationOp, RecordEvent};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub project_id: Option<i64>,
}

/// Body for the status-only update used by the board-style quick actions.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateTaskStatus {
    pub status: TaskStatus,
}

pub async fn list_tasks(
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<TaskListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<TaskWithContext>>>, ApiError> {
    let pool = &deployment.db().pool;
    let tasks = match query.project_id {
        Some(project_id) => Task::find_by_project_id_with_context(pool, project_id).await?,
        None => Task::find_all_with_context(pool).await?,
    };
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn get_task(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn create_task(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::create(&deployment.db().pool, &payload).await?;
    deployment.events().publish(RecordEvent::new(
        EntityKind::Task,
        MutationOp::Created,
        task.id,
    ));
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::update(&deployment.db().pool, id, &payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    deployment.events().publish(RecordEvent::new(
        EntityKind::Task,
        MutationOp::Updated,
        task.id,
    ));
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task_status(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<UpdateTaskStatus>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::update_status(&deployment.db().pool, id, payload.status)
        .await?
        .ok_or(ApiError::NotFound)?;
    deployment.events().publish(RecordEvent::new(
        EntityKind::Task,
        MutationOp::Updated,
        task.id,
    ));
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn delete_task(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Task::delete(&deployment.db().pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    deployment
        .events()
        .publish(RecordEvent::new(EntityKind::Task, MutationOp::Deleted, id));
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/tasks",
        Router::new()
            .route("/", get(list_tasks).post(create_task))
            .route("/{id}", get(get_task).put(update_task).delete(delete_task))
            .route("/{id}/status", put(update_task_status)),
    )
}
