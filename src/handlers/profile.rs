//! Financial-profile form handlers
//!
//! Six independent create endpoints, all protected by the request gate and
//! all following the same validate-persist-respond shape. No ordering or
//! cross-form consistency is enforced.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    ApiResponse, CareerInfoRequest, ExistingDebtRequest, ExpensesRequest, FamilyBackgroundRequest,
    FinancialGoalsRequest, RiskAppetiteRequest,
};

/// POST /family-background
pub async fn add_family_background(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(req), _): WithRejection<Json<FamilyBackgroundRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let record = state
        .profile_store
        .insert_family_background(
            user.user_id,
            req.household_size,
            req.family_income,
            req.dependents,
        )
        .await?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        record,
        "Family background added successfully",
    ))
}

/// POST /career-info
pub async fn add_career_info(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(req), _): WithRejection<Json<CareerInfoRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let record = state
        .profile_store
        .insert_career_info(
            user.user_id,
            &req.employment_status,
            req.job_stability,
            req.income_level,
        )
        .await?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        record,
        "Career info added successfully",
    ))
}

/// POST /expenses
pub async fn add_expenses(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(req), _): WithRejection<Json<ExpensesRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let record = state
        .profile_store
        .insert_expenses(user.user_id, req.fixed_expenditure, req.variable_expenditure)
        .await?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        record,
        "Expenses added successfully",
    ))
}

/// POST /risk-appetite
pub async fn add_risk_appetite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(req), _): WithRejection<Json<RiskAppetiteRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let record = state
        .profile_store
        .insert_risk_appetite(user.user_id, req.risk_level)
        .await?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        record,
        "Risk appetite added successfully",
    ))
}

/// POST /financial-goals
pub async fn add_financial_goals(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(req), _): WithRejection<Json<FinancialGoalsRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let record = state
        .profile_store
        .insert_financial_goals(user.user_id, &req.goal_type, &req.expected_return)
        .await?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        record,
        "Financial goals added successfully",
    ))
}

/// POST /existing-debt
pub async fn add_existing_debt(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(req), _): WithRejection<Json<ExistingDebtRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let record = state
        .profile_store
        .insert_existing_debt(
            user.user_id,
            req.current_loans,
            req.credit_card_debt,
            req.other_debt,
        )
        .await?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        record,
        "Existing debt added successfully",
    ))
}
