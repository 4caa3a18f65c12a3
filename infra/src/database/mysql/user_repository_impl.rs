//! MySQL implementation of the UserRepository trait.
//!
//! Uniqueness of username, email and phone number among live accounts is
//! enforced by the schema; a violated index is reported as
//! `AuthError::DuplicateIdentity` naming the field.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};
use tracing::error;
use uuid::Uuid;

use tg_core::domain::entities::User;
use tg_core::errors::{AuthError, DomainError};
use tg_core::repositories::{UserField, UserQuery, UserRepository};

const USER_COLUMNS: &str = "id, username, email, phone_number, password_hash, is_admin, \
     is_staff, is_superuser, is_active, is_deleted, created_at, updated_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(column_error)?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("Invalid UUID: {}", e)))?,
            username: row.try_get("username").map_err(column_error)?,
            email: row.try_get("email").map_err(column_error)?,
            phone_number: row.try_get("phone_number").map_err(column_error)?,
            password_hash: row.try_get("password_hash").map_err(column_error)?,
            is_admin: row.try_get("is_admin").map_err(column_error)?,
            is_staff: row.try_get("is_staff").map_err(column_error)?,
            is_superuser: row.try_get("is_superuser").map_err(column_error)?,
            is_active: row.try_get("is_active").map_err(column_error)?,
            is_deleted: row.try_get("is_deleted").map_err(column_error)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column_error)?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(column_error)?,
        })
    }

    async fn fetch_one_where(
        &self,
        condition: &str,
        value: String,
    ) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE {} AND is_deleted = FALSE LIMIT 1",
            USER_COLUMNS, condition
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Append the listing filters shared by the page and count queries
    fn push_filters(builder: &mut QueryBuilder<'_, MySql>, query: &UserQuery) {
        builder.push(" WHERE is_deleted = FALSE");

        if let Some(active) = query.is_active {
            builder.push(" AND is_active = ").push_bind(active);
        }

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
            builder
                .push(" AND (LOWER(username) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(email) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR phone_number LIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }
}

fn column_error(e: sqlx::Error) -> DomainError {
    DomainError::internal(format!("Failed to read user column: {}", e))
}

fn query_error(e: sqlx::Error) -> DomainError {
    error!(error = %e, "User query failed");
    DomainError::internal(format!("Database query failed: {}", e))
}

/// Map a write error, turning unique index violations into `DuplicateIdentity`
fn write_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_error) = &e {
        if db_error.is_unique_violation() {
            if let Some(field) = duplicate_field(db_error.message()) {
                return AuthError::DuplicateIdentity {
                    field: field.as_str().to_string(),
                }
                .into();
            }
        }
    }
    query_error(e)
}

/// Field behind a MySQL "Duplicate entry ... for key ..." message
pub(crate) fn duplicate_field(message: &str) -> Option<UserField> {
    let key = message.rsplit("for key").next()?;
    [UserField::Username, UserField::Email, UserField::PhoneNumber]
        .into_iter()
        .find(|field| key.contains(&format!("uq_users_{}", field.as_str())))
}

pub(crate) fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = format!(
            "INSERT INTO users ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            USER_COLUMNS
        );

        sqlx::query(&query)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.phone_number)
            .bind(&user.password_hash)
            .bind(user.is_admin)
            .bind(user.is_staff)
            .bind(user.is_superuser)
            .bind(user.is_active)
            .bind(user.is_deleted)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("id = ?", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("LOWER(email) = ?", email.trim().to_lowercase())
            .await
    }

    async fn exists(
        &self,
        field: UserField,
        value: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, DomainError> {
        // Column names come from a closed enum, never from input
        let query = format!(
            "SELECT COUNT(*) FROM users WHERE LOWER({}) = ? AND is_deleted = FALSE AND id <> ?",
            field.as_str()
        );

        let count: i64 = sqlx::query_scalar(&query)
            .bind(value.trim().to_lowercase())
            .bind(excluding.map(|id| id.to_string()).unwrap_or_default())
            .fetch_one(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(count > 0)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = ?,
                email = ?,
                phone_number = ?,
                password_hash = ?,
                is_admin = ?,
                is_staff = ?,
                is_superuser = ?,
                is_active = ?,
                is_deleted = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(user.is_active)
        .bind(user.is_deleted)
        .bind(user.updated_at)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        if result.rows_affected() == 0 {
            // MySQL reports 0 for an unchanged row too; tell the cases apart
            let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
                .bind(user.id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(query_error)?;
            if found == 0 {
                return Err(DomainError::not_found("User"));
            }
        }

        Ok(user)
    }

    async fn list(&self, query: &UserQuery) -> Result<(Vec<User>, u64), DomainError> {
        let mut count_builder = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM users");
        Self::push_filters(&mut count_builder, query);
        let total: i64 = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(query_error)?;

        let mut page_builder =
            QueryBuilder::<MySql>::new(format!("SELECT {} FROM users", USER_COLUMNS));
        Self::push_filters(&mut page_builder, query);
        page_builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(query.pagination.limit())
            .push(" OFFSET ")
            .push_bind(query.pagination.offset());

        let rows = page_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;
        let users = rows
            .iter()
            .map(Self::row_to_user)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((users, total.max(0) as u64))
    }
}
