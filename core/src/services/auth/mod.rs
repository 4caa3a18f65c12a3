//! Authentication flows
//!
//! Four flows, each one state transition:
//! - login start: check credentials, park a pending login, send a code
//! - register start: check uniqueness, park the registration, send a code
//! - verify login: confirm the code and authenticate the session
//! - verify register: confirm the code, create the account, authenticate
//!
//! The API layer picks the [`AuthFlow`] variant from the endpoint it serves.

mod config;
mod flow;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use flow::{AuthFlow, RegistrationRequest, RequestContext};
pub use service::AuthService;
