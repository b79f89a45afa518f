//! Financial-profile form records and their request DTOs
//!
//! Each form is an independent record linked to a user; no ordering or
//! cross-form consistency is enforced.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Family background record
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FamilyBackground {
    pub id: Uuid,
    pub user_id: Uuid,
    pub household_size: i32,
    pub family_income: f64,
    pub dependents: i32,
    pub completed: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FamilyBackgroundRequest {
    pub household_size: i32,
    pub family_income: f64,
    pub dependents: i32,
}

/// Career info record
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CareerInfo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub employment_status: String,
    pub job_stability: f64,
    pub income_level: f64,
    pub completed: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CareerInfoRequest {
    #[validate(length(min = 1, message = "employmentStatus is required"))]
    pub employment_status: String,
    pub job_stability: f64,
    pub income_level: f64,
}

/// Expenses record
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expenses {
    pub id: Uuid,
    pub user_id: Uuid,
    pub fixed_expenditure: f64,
    pub variable_expenditure: f64,
    pub completed: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExpensesRequest {
    pub fixed_expenditure: f64,
    pub variable_expenditure: f64,
}

/// Risk appetite record
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RiskAppetite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub risk_level: f64,
    pub completed: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RiskAppetiteRequest {
    pub risk_level: f64,
}

/// Financial goals record
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoals {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: String,
    pub expected_return: String,
    pub completed: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoalsRequest {
    #[validate(length(min = 1, message = "goalType is required"))]
    pub goal_type: String,

    #[validate(length(min = 1, message = "expectedReturn is required"))]
    pub expected_return: String,
}

/// Existing debt record
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExistingDebt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub current_loans: f64,
    pub credit_card_debt: f64,
    pub other_debt: f64,
    pub completed: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExistingDebtRequest {
    pub current_loans: f64,
    pub credit_card_debt: f64,
    pub other_debt: f64,
}
