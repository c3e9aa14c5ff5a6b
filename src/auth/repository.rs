// Credential store: user records behind a storage-agnostic trait

use axum::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    models::{NewUser, User, UserResponse},
};

/// Persistence operations the auth flow needs
///
/// Emails handed to a store are already normalized (trimmed, lowercase).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; a taken email yields `EmailAlreadyExists`
    async fn create_user(&self, new_user: NewUser) -> Result<User, AuthError>;

    /// Full record, secret hash included, for credential checks
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Summary without the secret hash
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserResponse>, AuthError>;

    /// All users without secret hashes, oldest first
    async fn list_users(&self) -> Result<Vec<UserResponse>, AuthError>;

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError>;
}

/// Postgres-backed user store
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Check for unique constraint violation
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserResponse>, AuthError> {
        let user = sqlx::query_as::<_, UserResponse>(
            "SELECT id, name, email, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<UserResponse>, AuthError> {
        let users = sqlx::query_as::<_, UserResponse>(
            "SELECT id, name, email, role, created_at, updated_at FROM users ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }
}

/// In-process user store for tests and local runs
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AuthError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&new_user.email)) {
            return Err(AuthError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserResponse>, AuthError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned().map(UserResponse::from))
    }

    async fn list_users(&self) -> Result<Vec<UserResponse>, AuthError> {
        let users = self.users.read().await;
        Ok(users.iter().cloned().map(UserResponse::from).collect())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.email.eq_ignore_ascii_case(email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$not-a-real-hash".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryUserStore::new();
        let created = store.create_user(new_user("ada@example.com")).await.unwrap();

        let by_email = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.password_hash, created.password_hash);

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ada@example.com");
        assert!(store.email_exists("ADA@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_store_unchanged() {
        let store = MemoryUserStore::new();
        store.create_user(new_user("ada@example.com")).await.unwrap();

        let result = store.create_user(new_user("Ada@Example.com")).await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyExists)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_lookups_return_none() {
        let store = MemoryUserStore::new();
        assert!(store.is_empty().await);
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(!store.email_exists("nobody@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_users_in_insertion_order() {
        let store = MemoryUserStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();
        store.create_user(new_user("b@example.com")).await.unwrap();

        let emails: Vec<String> = store.list_users().await.unwrap().into_iter().map(|u| u.email).collect();
        assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
    }
}
