//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use skyseat_core::config::AppConfig;
use skyseat_service::{AdminService, AllocationService, SeatStore};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Check-in allocation service
    pub allocation_service: Arc<AllocationService>,
    /// Reset, release and pool reads
    pub admin_service: Arc<AdminService>,
    /// When the state was built, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wire services over a store handle.
    pub fn new(config: AppConfig, store: Arc<dyn SeatStore>) -> Self {
        let allocation_service = Arc::new(AllocationService::new(
            Arc::clone(&store),
            &config.allocation,
        ));
        let admin_service = Arc::new(AdminService::new(store));
        Self {
            config: Arc::new(config),
            allocation_service,
            admin_service,
            started_at: Instant::now(),
        }
    }
}
