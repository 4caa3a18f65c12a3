//! Value objects returned by services or accepted as inputs.

pub mod auth_response;
pub mod user_profile;

pub use auth_response::{AuthResponse, FlowOutcome};
pub use user_profile::{ProfileChanges, UserProfile};
