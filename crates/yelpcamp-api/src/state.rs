//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.

use yelpcamp_store::{Repository, RepositoryOptions};

/// Port used when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 3000;

/// Application configuration, read from the environment at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// PostgreSQL connection URL. If `None`, the store runs in memory only.
    pub database_url: Option<String>,
    /// Delete a campground's reviews together with the campground.
    pub cascade_review_delete: bool,
}

impl AppConfig {
    /// Read `PORT`, `DATABASE_URL` and `YELPCAMP_CASCADE_DELETE`.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let cascade_review_delete = std::env::var("YELPCAMP_CASCADE_DELETE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            port,
            database_url,
            cascade_review_delete,
        }
    }

    /// Options handed to the repository.
    pub fn repository_options(&self) -> RepositoryOptions {
        RepositoryOptions {
            cascade_review_delete: self.cascade_review_delete,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// The URL usually embeds credentials.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cascade_review_delete", &self.cascade_review_delete)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            cascade_review_delete: false,
        }
    }
}

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Campground and review persistence.
    pub repository: Repository,
    /// Configuration the process was started with.
    pub config: AppConfig,
}

impl AppState {
    /// Build state around an already-connected repository.
    pub fn new(config: AppConfig, repository: Repository) -> Self {
        Self { repository, config }
    }

    /// In-memory state with the given configuration. Used by tests.
    pub fn in_memory(config: AppConfig) -> Self {
        let repository = Repository::in_memory(config.repository_options());
        Self { repository, config }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(AppConfig::default())
    }
}
