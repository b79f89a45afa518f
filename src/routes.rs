//! Route definitions for the FinBoard API

use axum::{routing::post, Router};

use crate::app_state::AppState;
use crate::handlers::*;

/// Authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-token", post(refresh_token))
}

/// Financial-profile form routes (all protected by the request gate)
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/family-background", post(add_family_background))
        .route("/career-info", post(add_career_info))
        .route("/expenses", post(add_expenses))
        .route("/risk-appetite", post(add_risk_appetite))
        .route("/financial-goals", post(add_financial_goals))
        .route("/existing-debt", post(add_existing_debt))
}
