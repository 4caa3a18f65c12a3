//! User entity representing a registered account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered account
///
/// `username`, `email` and `phone_number` are each unique across all
/// accounts that have not been soft-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    pub username: String,

    pub email: String,

    pub phone_number: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub is_admin: bool,

    /// Staff accounts may list and search all users
    pub is_staff: bool,

    /// Superusers may act on any account
    pub is_superuser: bool,

    /// Inactive accounts cannot log in
    pub is_active: bool,

    /// Soft-deleted accounts are hidden from every lookup
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a regular, active account
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            password_hash: password_hash.into(),
            is_admin: false,
            is_staff: false,
            is_superuser: false,
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a staff account with admin rights
    pub fn new_admin(
        username: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let mut user = Self::new(username, email, phone_number, password_hash);
        user.is_admin = true;
        user.is_staff = true;
        user
    }

    /// Creates a superuser (implies staff and admin)
    pub fn new_superuser(
        username: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let mut user = Self::new_admin(username, email, phone_number, password_hash);
        user.is_superuser = true;
        user
    }

    /// Whether the account may authenticate
    pub fn can_login(&self) -> bool {
        self.is_active && !self.is_deleted
    }

    /// Owners and superusers may read or change an account
    pub fn can_manage(&self, target: Uuid) -> bool {
        self.is_superuser || self.id == target
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.updated_at = Utc::now();
    }

    /// Marks the account deleted and inactive; the record itself is kept
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new("alice", "alice@gmail.com", "09123456789", "$2b$hash")
    }

    #[test]
    fn test_new_user_creation() {
        let user = sample();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@gmail.com");
        assert!(user.is_active);
        assert!(!user.is_deleted);
        assert!(!user.is_staff);
        assert!(!user.is_superuser);
        assert!(user.can_login());
    }

    #[test]
    fn test_role_constructors() {
        let admin = User::new_admin("root", "root@gmail.com", "09120000000", "h");
        assert!(admin.is_admin && admin.is_staff && !admin.is_superuser);

        let superuser = User::new_superuser("boss", "boss@gmail.com", "09120000001", "h");
        assert!(superuser.is_admin && superuser.is_staff && superuser.is_superuser);
    }

    #[test]
    fn test_soft_delete() {
        let mut user = sample();
        let before = user.updated_at;

        user.soft_delete();

        assert!(user.is_deleted);
        assert!(!user.is_active);
        assert!(!user.can_login());
        assert!(user.updated_at >= before);
    }

    #[test]
    fn test_can_manage() {
        let owner = sample();
        let other = User::new("bob", "bob@gmail.com", "09123456780", "h");
        let superuser = User::new_superuser("boss", "boss@gmail.com", "09120000001", "h");

        assert!(owner.can_manage(owner.id));
        assert!(!other.can_manage(owner.id));
        assert!(superuser.can_manage(owner.id));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("password_hash"));
    }
}
