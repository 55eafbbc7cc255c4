use axum::{Router, response::Json as ResponseJson, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utils::response::ApiResponse;

use crate::DeploymentImpl;

pub mod clients;
pub mod events;
pub mod frontend;
pub mod meetings;
pub mod mindmap;
pub mod projects;
pub mod tasks;

pub async fn health() -> ResponseJson<ApiResponse<String>> {
    ResponseJson(ApiResponse::success("ok".to_string()))
}

pub fn router(deployment: &DeploymentImpl) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(clients::router(deployment))
        .merge(projects::router(deployment))
        .merge(tasks::router(deployment))
        .merge(meetings::router(deployment))
        .merge(mindmap::router(deployment))
        .merge(events::router(deployment));

    Router::new()
        .nest("/api", api)
        .fallback(frontend::serve_asset)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(deployment.clone())
}
