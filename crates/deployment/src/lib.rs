use async_trait::async_trait;
use db::{DBService, DBServiceError};
use services::services::events::EventService;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Database(#[from] DBServiceError),
}

/// Capability seam between the HTTP layer and the runtime environment.
/// Routes are written against this trait; the concrete deployment decides
/// where the database lives and how the event bus is wired.
#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new(database_url: &str) -> Result<Self, DeploymentError>;

    fn db(&self) -> &DBService;

    fn events(&self) -> &EventService;
}
