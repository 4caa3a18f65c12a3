//! Domain entities representing core business objects.

pub mod pending_action;
pub mod token;
pub mod user;
pub mod verification_code;

// Re-export commonly used types
pub use pending_action::{PendingAction, PendingActionKind, PendingRegistration};
pub use token::{Claims, TokenPair, TokenType, JWT_AUDIENCE, JWT_ISSUER};
pub use user::User;
pub use verification_code::{IssuedCode, CODE_LENGTH, CODE_TTL_SECONDS};
