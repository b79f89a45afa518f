//! In-memory store implementation
//!
//! Used by the test suite and by the server when no DATABASE_URL is
//! configured. Mutations to a user record happen under one write lock, which
//! gives the same atomicity the Postgres conditional update provides.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    CareerInfo, ExistingDebt, Expenses, FamilyBackground, FinancialGoals, RiskAppetite, User,
};

use super::{CredentialStore, NewUser, ProfileStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    // The API has no profile reads; records are still kept so the store
    // behaves like one.
    family_backgrounds: RwLock<Vec<FamilyBackground>>,
    career_infos: RwLock<Vec<CareerInfo>>,
    expenses: RwLock<Vec<Expenses>>,
    risk_appetites: RwLock<Vec<RiskAppetite>>,
    financial_goals: RwLock<Vec<FinancialGoals>>,
    existing_debts: RwLock<Vec<ExistingDebt>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            full_name: new_user.full_name,
            password_hash: new_user.password_hash,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            user.refresh_token = token.map(str::to_string);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn swap_refresh_token(
        &self,
        id: Uuid,
        current: &str,
        next: &str,
    ) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;

        match users.get_mut(&id) {
            Some(user) if user.refresh_token.as_deref() == Some(current) => {
                user.refresh_token = Some(next.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn insert_family_background(
        &self,
        user_id: Uuid,
        household_size: i32,
        family_income: f64,
        dependents: i32,
    ) -> Result<FamilyBackground, StoreError> {
        let record = FamilyBackground {
            id: Uuid::new_v4(),
            user_id,
            household_size,
            family_income,
            dependents,
            completed: true,
        };
        self.family_backgrounds.write().await.push(record.clone());
        Ok(record)
    }

    async fn insert_career_info(
        &self,
        user_id: Uuid,
        employment_status: &str,
        job_stability: f64,
        income_level: f64,
    ) -> Result<CareerInfo, StoreError> {
        let record = CareerInfo {
            id: Uuid::new_v4(),
            user_id,
            employment_status: employment_status.to_string(),
            job_stability,
            income_level,
            completed: true,
        };
        self.career_infos.write().await.push(record.clone());
        Ok(record)
    }

    async fn insert_expenses(
        &self,
        user_id: Uuid,
        fixed_expenditure: f64,
        variable_expenditure: f64,
    ) -> Result<Expenses, StoreError> {
        let record = Expenses {
            id: Uuid::new_v4(),
            user_id,
            fixed_expenditure,
            variable_expenditure,
            completed: true,
        };
        self.expenses.write().await.push(record.clone());
        Ok(record)
    }

    async fn insert_risk_appetite(
        &self,
        user_id: Uuid,
        risk_level: f64,
    ) -> Result<RiskAppetite, StoreError> {
        let record = RiskAppetite {
            id: Uuid::new_v4(),
            user_id,
            risk_level,
            completed: true,
        };
        self.risk_appetites.write().await.push(record.clone());
        Ok(record)
    }

    async fn insert_financial_goals(
        &self,
        user_id: Uuid,
        goal_type: &str,
        expected_return: &str,
    ) -> Result<FinancialGoals, StoreError> {
        let record = FinancialGoals {
            id: Uuid::new_v4(),
            user_id,
            goal_type: goal_type.to_string(),
            expected_return: expected_return.to_string(),
            completed: true,
        };
        self.financial_goals.write().await.push(record.clone());
        Ok(record)
    }

    async fn insert_existing_debt(
        &self,
        user_id: Uuid,
        current_loans: f64,
        credit_card_debt: f64,
        other_debt: f64,
    ) -> Result<ExistingDebt, StoreError> {
        let record = ExistingDebt {
            id: Uuid::new_v4(),
            user_id,
            current_loans,
            credit_card_debt,
            other_debt,
            completed: true,
        };
        self.existing_debts.write().await.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            full_name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "$2b$12$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.create(new_user("a@x.com")).await.unwrap();

        let err = store.create(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_swap_refresh_token_is_conditional() {
        let store = MemoryStore::new();
        let user = store.create(new_user("a@x.com")).await.unwrap();

        store.set_refresh_token(user.id, Some("r1")).await.unwrap();

        // First swap from the current value wins
        assert!(store.swap_refresh_token(user.id, "r1", "r2").await.unwrap());

        // Replaying the old value loses
        assert!(!store.swap_refresh_token(user.id, "r1", "r3").await.unwrap());

        let stored = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_swap_fails_after_clear() {
        let store = MemoryStore::new();
        let user = store.create(new_user("a@x.com")).await.unwrap();

        store.set_refresh_token(user.id, Some("r1")).await.unwrap();
        store.set_refresh_token(user.id, None).await.unwrap();

        assert!(!store.swap_refresh_token(user.id, "r1", "r2").await.unwrap());
    }
}
