//! Tollgate core business logic
//!
//! Domain entities, the error taxonomy, collaborator traits and the services
//! that drive registration, OTP verification and login.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

pub use domain::entities::{
    Claims, IssuedCode, PendingAction, PendingActionKind, PendingRegistration, TokenPair,
    TokenType, User,
};
pub use domain::value_objects::{AuthResponse, FlowOutcome, ProfileChanges, UserProfile};
pub use errors::{AuthError, DomainError, DomainResult, ErrorResponse, TokenError, ValidationError};
pub use repositories::{UserField, UserQuery, UserRepository};
pub use services::{
    AccountService, AuthFlow, AuthService, AuthServiceConfig, EphemeralStore, Mailer,
    NewSuperuser, PasswordChange, PasswordHasher, RegistrationRequest, RequestContext,
    SessionBridge, TokenService, TokenServiceConfig, VerificationServiceConfig,
};
