use async_trait::async_trait;
use db::DBService;
use deployment::{Deployment, DeploymentError};
use services::services::events::EventService;

/// Deployment backed by a local SQLite file and an in-process event bus.
#[derive(Clone)]
pub struct LocalDeployment {
    db: DBService,
    events: EventService,
}

impl LocalDeployment {
    /// In-memory variant for tests: same wiring, throwaway database.
    pub async fn new_in_memory() -> Result<Self, DeploymentError> {
        let db = DBService::new_in_memory().await?;
        Ok(Self {
            db,
            events: EventService::new(),
        })
    }
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new(database_url: &str) -> Result<Self, DeploymentError> {
        let db = DBService::new(database_url).await?;
        Ok(Self {
            db,
            events: EventService::new(),
        })
    }

    fn db(&self) -> &DBService {
        &self.db
    }

    fn events(&self) -> &EventService {
        &self.events
    }
}
