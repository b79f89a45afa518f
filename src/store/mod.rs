//! Persistence interface for the credential and profile stores
//!
//! The traits are the contract the rest of the system is written against;
//! the server wires in [`PgStore`] when a database is configured and
//! [`MemoryStore`] otherwise (tests use the latter throughout).

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CareerInfo, ExistingDebt, Expenses, FamilyBackground, FinancialGoals, RiskAppetite, User,
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate email")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(String),
}

/// Payload for creating a user record
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Persists user identity, password hash, and the single current refresh
/// token per user.
///
/// `swap_refresh_token` is the conditional update that makes rotation and
/// replay detection race-free: the write succeeds only where the stored
/// token still equals the incoming one.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Create a user; fails with [`StoreError::DuplicateEmail`] if the email
    /// is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Set (login/refresh) or clear (logout) the stored refresh token.
    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<(), StoreError>;

    /// Replace the stored refresh token with `next` only if it currently
    /// equals `current`. Returns whether the swap happened.
    async fn swap_refresh_token(
        &self,
        id: Uuid,
        current: &str,
        next: &str,
    ) -> Result<bool, StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Persists the six independent financial-profile records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn insert_family_background(
        &self,
        user_id: Uuid,
        household_size: i32,
        family_income: f64,
        dependents: i32,
    ) -> Result<FamilyBackground, StoreError>;

    async fn insert_career_info(
        &self,
        user_id: Uuid,
        employment_status: &str,
        job_stability: f64,
        income_level: f64,
    ) -> Result<CareerInfo, StoreError>;

    async fn insert_expenses(
        &self,
        user_id: Uuid,
        fixed_expenditure: f64,
        variable_expenditure: f64,
    ) -> Result<Expenses, StoreError>;

    async fn insert_risk_appetite(
        &self,
        user_id: Uuid,
        risk_level: f64,
    ) -> Result<RiskAppetite, StoreError>;

    async fn insert_financial_goals(
        &self,
        user_id: Uuid,
        goal_type: &str,
        expected_return: &str,
    ) -> Result<FinancialGoals, StoreError>;

    async fn insert_existing_debt(
        &self,
        user_id: Uuid,
        current_loans: f64,
        credit_card_debt: f64,
        other_debt: f64,
    ) -> Result<ExistingDebt, StoreError>;
}
