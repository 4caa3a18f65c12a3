//! In-flight login or registration awaiting code confirmation.

use serde::{Deserialize, Serialize};

/// Which start step produced a pending action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingActionKind {
    Login,
    Register,
}

impl PendingActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }
}

/// Registration payload held until the code is confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub email: String,
    pub phone_number: String,
    pub username: String,
    /// Already hashed; the plaintext password never reaches the store
    pub password_hash: String,
}

/// Session-scoped payload between a start step and its verify step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PendingAction {
    Login { email: String },
    Register(PendingRegistration),
}

impl PendingAction {
    pub fn kind(&self) -> PendingActionKind {
        match self {
            Self::Login { .. } => PendingActionKind::Login,
            Self::Register(_) => PendingActionKind::Register,
        }
    }

    /// Email the code was issued for
    pub fn email(&self) -> &str {
        match self {
            Self::Login { email } => email,
            Self::Register(registration) => &registration.email,
        }
    }
}
