/// Server configuration, read once at startup from the environment (a
/// `.env` file is honored via dotenvy before this runs).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(3000);
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://mindmap.db".to_string());
        Self {
            host,
            port,
            database_url,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
