use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::project::{CreateProject, Project, ProjectWithClient, UpdateProject};
use deployment::Deployment;
use serde::Deserialize;
use services::services::events::{EntityKind, MutationOp, RecordEvent};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct ProjectListQuery {
    pub client_id: Option<i64>,
    /// `?open=true` narrows to unfinished projects, for the task form
    /// dropdown.
    #[serde(default)]
    pub open: bool,
}

pub async fn list_projects(
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<ProjectListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<ProjectWithClient>>>, ApiError> {
    let pool = &deployment.db().pool;
    let projects = if query.open {
        Project::find_open_with_client(pool).await?
    } else if let Some(client_id) = query.client_id {
        Project::find_by_client_id_with_client(pool, client_id).await?
    } else {
        Project::find_all_with_client(pool).await?
    };
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn get_project(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = Project::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn create_project(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = Project::create(&deployment.db().pool, &payload).await?;
    deployment.events().publish(RecordEvent::new(
        EntityKind::Project,
        MutationOp::Created,
        project.id,
    ));
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn update_project(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<UpdateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = Project::update(&deployment.db().pool, id, &payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    deployment.events().publish(RecordEvent::new(
        EntityKind::Project,
        MutationOp::Updated,
        project.id,
    ));
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn delete_project(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Project::delete(&deployment.db().pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    deployment.events().publish(RecordEvent::new(
        EntityKind::Project,
        MutationOp::Deleted,
        id,
    ));
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/projects",
        Router::new()
            .route("/", get(list_projects).post(create_project))
            .route(
                "/{id}",
                get(get_project).put(update_project).delete(delete_project),
            ),
    )
}
