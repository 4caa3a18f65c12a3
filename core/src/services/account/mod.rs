//! Profile management for authenticated accounts

mod service;

pub use service::{AccountService, NewSuperuser, PasswordChange};
