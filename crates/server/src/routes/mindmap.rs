use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{client::Client, project::Project, task::Task};
use deployment::Deployment;
use serde::Deserialize;
use services::services::{
    hierarchy::{self, MindmapBuild, MindmapNode},
    layout::{self, LayoutOptions, MindmapLayout},
};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

/// GET /api/mindmap
/// Full snapshot of the three record sets, rebuilt into the display tree.
/// `data` is null when there are no clients (the empty state).
pub async fn get_mindmap(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Option<MindmapNode>>>, ApiError> {
    let build = build_snapshot(&deployment).await?;
    Ok(ResponseJson(ApiResponse::success(build.root)))
}

#[derive(Debug, Default, Deserialize)]
pub struct LayoutQuery {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// GET /api/mindmap/layout
/// Same tree, run through the layout walk: positioned nodes plus one link
/// per parent-child edge, ready to draw.
pub async fn get_mindmap_layout(
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<LayoutQuery>,
) -> Result<ResponseJson<ApiResponse<Option<MindmapLayout>>>, ApiError> {
    let build = build_snapshot(&deployment).await?;

    let mut options = LayoutOptions::default();
    if let Some(width) = query.width {
        options.width = width;
    }
    if let Some(height) = query.height {
        options.height = height;
    }

    let laid = build.root.as_ref().map(|root| layout::layout(root, options));
    Ok(ResponseJson(ApiResponse::success(laid)))
}

async fn build_snapshot(deployment: &DeploymentImpl) -> Result<MindmapBuild, ApiError> {
    let pool = &deployment.db().pool;
    let (clients, projects, tasks) = tokio::try_join!(
        Client::summaries(pool),
        Project::summaries(pool),
        Task::summaries(pool),
    )?;

    let build = hierarchy::build(&clients, &projects, &tasks)?;
    if !build.dropped.is_empty() {
        tracing::warn!(
            missing_project = ?build.dropped.missing_project,
            unreachable = ?build.dropped.unreachable,
            "mindmap dropped {} task(s) with dangling references",
            build.dropped.total()
        );
    }
    Ok(build)
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/mindmap",
        Router::new()
            .route("/", get(get_mindmap))
            .route("/layout", get(get_mindmap_layout)),
    )
}
