//! Results of the verification flows.

use serde::{Deserialize, Serialize};

use crate::domain::entities::TokenPair;

use super::UserProfile;

/// Credentials handed out once a verify step succeeds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: UserProfile,
}

/// What a processed flow produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// A start step stored its pending action and dispatched a code
    CodeSent,
    /// A verify step confirmed the code and authenticated the session
    Authenticated(AuthResponse),
}

impl FlowOutcome {
    /// Credentials, when the flow ended in an authenticated session
    pub fn into_auth_response(self) -> Option<AuthResponse> {
        match self {
            Self::Authenticated(response) => Some(response),
            Self::CodeSent => None,
        }
    }
}
