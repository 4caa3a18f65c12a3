//! User directory trait defining the interface for account persistence.
//!
//! The directory owns the uniqueness of username, email and phone number
//! among accounts that are not soft-deleted. Soft-deleted accounts are
//! invisible to every read operation.

use async_trait::async_trait;
use uuid::Uuid;

use tg_shared::types::Pagination;

use crate::domain::entities::User;
use crate::errors::DomainError;

/// Columns that carry a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Username,
    Email,
    PhoneNumber,
}

impl UserField {
    /// Column / field name as exposed to clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
        }
    }

    /// Reads the matching value from a user
    pub fn value_of<'a>(&self, user: &'a User) -> &'a str {
        match self {
            Self::Username => &user.username,
            Self::Email => &user.email,
            Self::PhoneNumber => &user.phone_number,
        }
    }
}

/// Filters for the admin user listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub pagination: Pagination,
    /// Substring matched against username, email and phone number
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// Repository trait for account persistence
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use tg_core::domain::entities::User;
/// use tg_core::errors::DomainError;
/// use tg_core::repositories::{UserField, UserQuery, UserRepository};
///
/// struct InlineDirectory;
///
/// #[async_trait]
/// impl UserRepository for InlineDirectory {
///     async fn create(&self, user: User) -> Result<User, DomainError> { Ok(user) }
///     async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, DomainError> { Ok(None) }
///     async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> { Ok(None) }
///     async fn exists(
///         &self,
///         _field: UserField,
///         _value: &str,
///         _excluding: Option<Uuid>,
///     ) -> Result<bool, DomainError> { Ok(false) }
///     async fn update(&self, user: User) -> Result<User, DomainError> { Ok(user) }
///     async fn list(&self, _query: &UserQuery) -> Result<(Vec<User>, u64), DomainError> {
///         Ok((Vec::new(), 0))
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account
    ///
    /// # Returns
    /// * `Ok(User)` - The stored account
    /// * `Err(DomainError::Auth(AuthError::DuplicateIdentity))` - A unique field is taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Find a live account by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a live account by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Whether a live account other than `excluding` already uses `value` for `field`
    async fn exists(
        &self,
        field: UserField,
        value: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, DomainError>;

    /// Replace a stored account, bumping nothing but what the caller changed
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// One page of live accounts, newest first, plus the total match count
    async fn list(&self, query: &UserQuery) -> Result<(Vec<User>, u64), DomainError>;
}
