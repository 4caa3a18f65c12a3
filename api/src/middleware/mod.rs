//! Middleware and request extractors

pub mod auth;
pub mod session;
pub mod throttle;

pub use auth::{AuthContext, JwtAuth};
pub use session::{ClientAddress, ClientSession, SessionLayer, SESSION_HEADER};
pub use throttle::Throttle;
