//! Business services containing domain logic and use cases.

pub mod account;
pub mod auth;
pub mod password;
pub mod session;
pub mod token;
pub mod verification;

pub use account::{AccountService, NewSuperuser, PasswordChange};
pub use auth::{AuthFlow, AuthService, AuthServiceConfig, RegistrationRequest, RequestContext};
pub use password::PasswordHasher;
pub use session::SessionBridge;
pub use token::{TokenService, TokenServiceConfig};
pub use verification::{
    AbuseGuard, CodeGenerator, EphemeralStore, Mailer, PendingActionStore,
    VerificationServiceConfig,
};
