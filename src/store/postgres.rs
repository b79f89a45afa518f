//! Postgres-backed store implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    CareerInfo, ExistingDebt, Expenses, FamilyBackground, FinancialGoals, RiskAppetite, User,
};

use super::{CredentialStore, NewUser, ProfileStore, StoreError};

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation(&e) {
            StoreError::DuplicateEmail
        } else {
            StoreError::Database(e.to_string())
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Store backed by Postgres; writes to a user record are single-statement
/// atomic updates, so no transactions are needed.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as(
            r#"
            SELECT id, email, full_name, password_hash, refresh_token, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as(
            r#"
            SELECT id, email, full_name, password_hash, refresh_token, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&new_user.email)
        .bind(&new_user.full_name)
        .bind(&new_user.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            email: new_user.email,
            full_name: new_user.full_name,
            password_hash: new_user.password_hash,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        })
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(token)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn swap_refresh_token(
        &self,
        id: Uuid,
        current: &str,
        next: &str,
    ) -> Result<bool, StoreError> {
        // Conditional update: only one of two racing refreshes can win.
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $1, updated_at = NOW()
            WHERE id = $2 AND refresh_token = $3
            "#,
        )
        .bind(next)
        .bind(id)
        .bind(current)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected == 1)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn insert_family_background(
        &self,
        user_id: Uuid,
        household_size: i32,
        family_income: f64,
        dependents: i32,
    ) -> Result<FamilyBackground, StoreError> {
        let record = sqlx::query_as(
            r#"
            INSERT INTO family_backgrounds (id, user_id, household_size, family_income, dependents, completed)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING id, user_id, household_size, family_income, dependents, completed
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(household_size)
        .bind(family_income)
        .bind(dependents)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_career_info(
        &self,
        user_id: Uuid,
        employment_status: &str,
        job_stability: f64,
        income_level: f64,
    ) -> Result<CareerInfo, StoreError> {
        let record = sqlx::query_as(
            r#"
            INSERT INTO career_infos (id, user_id, employment_status, job_stability, income_level, completed)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING id, user_id, employment_status, job_stability, income_level, completed
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(employment_status)
        .bind(job_stability)
        .bind(income_level)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_expenses(
        &self,
        user_id: Uuid,
        fixed_expenditure: f64,
        variable_expenditure: f64,
    ) -> Result<Expenses, StoreError> {
        let record = sqlx::query_as(
            r#"
            INSERT INTO expenses (id, user_id, fixed_expenditure, variable_expenditure, completed)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING id, user_id, fixed_expenditure, variable_expenditure, completed
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(fixed_expenditure)
        .bind(variable_expenditure)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_risk_appetite(
        &self,
        user_id: Uuid,
        risk_level: f64,
    ) -> Result<RiskAppetite, StoreError> {
        let record = sqlx::query_as(
            r#"
            INSERT INTO risk_appetites (id, user_id, risk_level, completed)
            VALUES ($1, $2, $3, TRUE)
            RETURNING id, user_id, risk_level, completed
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(risk_level)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_financial_goals(
        &self,
        user_id: Uuid,
        goal_type: &str,
        expected_return: &str,
    ) -> Result<FinancialGoals, StoreError> {
        let record = sqlx::query_as(
            r#"
            INSERT INTO financial_goals (id, user_id, goal_type, expected_return, completed)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING id, user_id, goal_type, expected_return, completed
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(goal_type)
        .bind(expected_return)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_existing_debt(
        &self,
        user_id: Uuid,
        current_loans: f64,
        credit_card_debt: f64,
        other_debt: f64,
    ) -> Result<ExistingDebt, StoreError> {
        let record = sqlx::query_as(
            r#"
            INSERT INTO existing_debts (id, user_id, current_loans, credit_card_debt, other_debt, completed)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING id, user_id, current_loans, credit_card_debt, other_debt, completed
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(current_loans)
        .bind(credit_card_debt)
        .bind(other_debt)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }
}
