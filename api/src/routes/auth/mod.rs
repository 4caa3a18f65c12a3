//! Authentication route handlers
//!
//! Each endpoint maps onto exactly one flow of the core `AuthService`:
//! - `login` / `verify_login` - email and password, then the emailed code
//! - `register` / `verify_register` - new account, then the emailed code
//! - `logout` - ends the session established by a verify step

pub mod login;
pub mod logout;
pub mod register;

use actix_web::HttpRequest;

use tg_core::{AuthResponse, DomainError, FlowOutcome, RequestContext};

use crate::dto::auth::VerifyCodeResponse;
use crate::middleware::{ClientAddress, ClientSession};

pub use login::{login, verify_login};
pub use logout::logout;
pub use register::{register, verify_register};

pub const CODE_SENT_MESSAGE: &str = "Code sent to your email";

pub(crate) fn request_context(req: &HttpRequest, session: &ClientSession) -> RequestContext {
    RequestContext::new(session.id.clone(), ClientAddress::of(req))
}

/// Credentials of a verify step, paired with the success message
pub(crate) fn verified(
    outcome: FlowOutcome,
    message: &str,
) -> Result<VerifyCodeResponse, DomainError> {
    let AuthResponse { tokens, user } = outcome
        .into_auth_response()
        .ok_or_else(|| DomainError::internal("verify step finished without credentials"))?;
    Ok(VerifyCodeResponse {
        message: message.to_string(),
        tokens,
        user,
    })
}
