use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use tg_core::{AuthFlow, EphemeralStore, Mailer, UserRepository};
use tg_shared::types::MessageResponse;
use tg_shared::validation::is_valid_email;

use crate::app::AppState;
use crate::dto::auth::{RegisterRequest, VerifyCodeRequest};
use crate::handlers::{ApiError, ApiResult};
use crate::middleware::ClientSession;

use super::{request_context, verified, CODE_SENT_MESSAGE};

/// Handler for POST /api/v1/auth/register
///
/// Parks the registration for this session and mails a code to the new
/// address. Nothing is persisted until `verify-register` succeeds.
pub async fn register<U, S, M>(
    req: HttpRequest,
    state: web::Data<AppState<U, S, M>>,
    session: ClientSession,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    S: EphemeralStore + 'static,
    M: Mailer + 'static,
{
    let body = body.into_inner();
    body.validate()?;
    if !is_valid_email(&body.email, &state.settings.allowed_email_domains) {
        return Err(ApiError::field("email", "Email domain is not allowed."));
    }

    let ctx = request_context(&req, &session);
    state
        .auth_service
        .process(&ctx, AuthFlow::RegisterStart(body.into_registration()))
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse::new(CODE_SENT_MESSAGE)))
}

/// Handler for POST /api/v1/auth/verify-register
pub async fn verify_register<U, S, M>(
    req: HttpRequest,
    state: web::Data<AppState<U, S, M>>,
    session: ClientSession,
    body: web::Json<VerifyCodeRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    S: EphemeralStore + 'static,
    M: Mailer + 'static,
{
    let body = body.into_inner();
    body.validate()?;

    let ctx = request_context(&req, &session);
    let outcome = state
        .auth_service
        .process(&ctx, AuthFlow::VerifyRegister { code: body.code })
        .await?;

    Ok(HttpResponse::Created().json(verified(outcome, "User created and verified successfully")?))
}
