use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::client::{Client, CreateClient, UpdateClient};
use deployment::Deployment;
use serde::Deserialize;
use services::services::events::{EntityKind, MutationOp, RecordEvent};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct ClientListQuery {
    /// `?active=true` narrows to active clients, for the form dropdowns.
    #[serde(default)]
    pub active: bool,
}

pub async fn list_clients(
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<ClientListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Client>>>, ApiError> {
    let pool = &deployment.db().pool;
    let clients = if query.active {
        Client::find_active(pool).await?
    } else {
        Client::find_all(pool).await?
    };
    Ok(ResponseJson(ApiResponse::success(clients)))
}

pub async fn get_client(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    let client = Client::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(client)))
}

pub async fn create_client(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateClient>,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    let client = Client::create(&deployment.db().pool, &payload).await?;
    deployment.events().publish(RecordEvent::new(
        EntityKind::Client,
        MutationOp::Created,
        client.id,
    ));
    Ok(ResponseJson(ApiResponse::success(client)))
}

pub async fn update_client(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<UpdateClient>,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    let client = Client::update(&deployment.db().pool, id, &payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    deployment.events().publish(RecordEvent::new(
        EntityKind::Client,
        MutationOp::Updated,
        client.id,
    ));
    Ok(ResponseJson(ApiResponse::success(client)))
}

pub async fn delete_client(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Client::delete(&deployment.db().pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    deployment
        .events()
        .publish(RecordEvent::new(EntityKind::Client, MutationOp::Deleted, id));
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/clients",
        Router::new()
            .route("/", get(list_clients).post(create_client))
            .route(
                "/{id}",
                get(get_client).put(update_client).delete(delete_client),
            ),
    )
}
