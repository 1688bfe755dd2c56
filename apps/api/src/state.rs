//! Shared application state.

use nova_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// State shared by every handler (wrapped in an `Arc` by the router).
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub jwt: JwtManager,
}

impl AppState {
    /// Builds the state, deriving the token manager from the config.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_access_lifetime_secs,
            config.jwt_refresh_lifetime_secs,
        );

        AppState { db, config, jwt }
    }
}
