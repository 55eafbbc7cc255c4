use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::meeting::{CreateMeeting, Meeting, MeetingWithClient, UpdateMeeting};
use deployment::Deployment;
use serde::Deserialize;
use services::services::events::{EntityKind, MutationOp, RecordEvent};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct MeetingListQuery {
    pub client_id: Option<i64>,
}

pub async fn list_meetings(
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<MeetingListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<MeetingWithClient>>>, ApiError> {
    let meetings =
        Meeting::find_all_with_client(&deployment.db().pool, query.client_id).await?;
    Ok(ResponseJson(ApiResponse::success(meetings)))
}

pub async fn get_meeting(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Meeting>>, ApiError> {
    let meeting = Meeting::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(meeting)))
}

pub async fn create_meeting(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateMeeting>,
) -> Result<ResponseJson<ApiResponse<Meeting>>, ApiError> {
    let meeting = Meeting::create(&deployment.db().pool, &payload).await?;
    deployment.events().publish(RecordEvent::new(
        EntityKind::Meeting,
        MutationOp::Created,
        meeting.id,
    ));
    Ok(ResponseJson(ApiResponse::success(meeting)))
}

pub async fn update_meeting(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<UpdateMeeting>,
) -> Result<ResponseJson<ApiResponse<Meeting>>, ApiError> {
    let meeting = Meeting::update(&deployment.db().pool, id, &payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    deployment.events().publish(RecordEvent::new(
        EntityKind::Meeting,
        MutationOp::Updated,
        meeting.id,
    ));
    Ok(ResponseJson(ApiResponse::success(meeting)))
}

pub async fn delete_meeting(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Meeting::delete(&deployment.db().pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    deployment.events().publish(RecordEvent::new(
        EntityKind::Meeting,
        MutationOp::Deleted,
        id,
    ));
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/meetings",
        Router::new()
            .route("/", get(list_meetings).post(create_meeting))
            .route(
                "/{id}",
                get(get_meeting).put(update_meeting).delete(delete_meeting),
            ),
    )
}
