pub mod admin_handler;
pub mod auth_handler;
pub mod bracket_handler;
pub mod health;
pub mod leaderboard_handler;

use crate::auth::SessionService;
use crate::service::{AdminService, BracketService, LeaderboardService};
use std::sync::Arc;

/// Shared handler state: the services plus session resolution.
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub bracket_service: Arc<BracketService>,
    pub admin_service: Arc<AdminService>,
    pub leaderboard_service: Arc<LeaderboardService>,
}
