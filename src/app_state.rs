//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthService;
use crate::store::ProfileStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub profile_store: Arc<dyn ProfileStore>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, profile_store: Arc<dyn ProfileStore>) -> Self {
        Self {
            auth_service,
            profile_store,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}
