use std::sync::Arc;
use std::time::Duration;

use fieldops_db::directory::PgDirectory;
use fieldops_notify::ReportSender;

use crate::config::ServerConfig;
use crate::engine::closure::ClosureNotifier;
use crate::engine::lifecycle::TicketLifecycle;
use crate::engine::resolver::OwnershipResolver;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fieldops_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client ownership resolution.
    pub resolver: Arc<OwnershipResolver>,
    /// Guarded ticket state changes and closure notification.
    pub lifecycle: Arc<TicketLifecycle>,
}

impl AppState {
    /// Wire the engine services against the Postgres-backed directory.
    pub fn new(
        pool: fieldops_db::DbPool,
        config: ServerConfig,
        sender: Arc<dyn ReportSender>,
    ) -> Self {
        let directory = Arc::new(PgDirectory::new(pool.clone()));

        let resolver = Arc::new(OwnershipResolver::new(
            directory.clone(),
            directory.clone(),
            config.ownership,
        ));
        let notifier = ClosureNotifier::new(
            pool.clone(),
            directory.clone(),
            directory,
            sender,
            Duration::from_secs(config.notify_timeout_secs),
        );
        let lifecycle = Arc::new(TicketLifecycle::new(
            pool.clone(),
            Arc::clone(&resolver),
            notifier,
        ));

        Self {
            pool,
            config: Arc::new(config),
            resolver,
            lifecycle,
        }
    }
}
