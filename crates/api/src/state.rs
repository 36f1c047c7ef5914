use std::sync::Arc;

use devalign_events::NotificationDispatcher;

use crate::config::ServerConfig;
use crate::workflows::approval::ApprovalService;
use crate::workflows::completion::CompletionEngine;
use crate::workflows::directory::Directory;
use crate::workflows::staffing::StaffingAllocator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: devalign_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// User lookup service.
    pub directory: Directory,
    /// Notification fan-out (in-app + best-effort email).
    pub dispatcher: NotificationDispatcher,
    /// Project creation and team membership workflow.
    pub staffing: StaffingAllocator,
    /// Borrow request decision workflow.
    pub approval: ApprovalService,
    /// Project completion and teardown workflow.
    pub completion: CompletionEngine,
}

impl AppState {
    /// Wire the workflow services from the pool and dispatcher.
    pub fn new(
        pool: devalign_db::DbPool,
        config: Arc<ServerConfig>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        let directory = Directory::new(pool.clone());
        Self {
            staffing: StaffingAllocator::new(pool.clone(), directory.clone(), dispatcher.clone()),
            approval: ApprovalService::new(pool.clone(), directory.clone(), dispatcher.clone()),
            completion: CompletionEngine::new(pool.clone(), directory.clone(), dispatcher.clone()),
            directory,
            dispatcher,
            pool,
            config,
        }
    }
}
