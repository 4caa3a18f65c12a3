use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use tg_core::{AuthFlow, EphemeralStore, Mailer, UserRepository};
use tg_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::auth::{LoginRequest, VerifyCodeRequest};
use crate::handlers::ApiResult;
use crate::middleware::ClientSession;

use super::{request_context, verified, CODE_SENT_MESSAGE};

/// Handler for POST /api/v1/auth/login
///
/// Checks the credentials and mails a code; the login is completed by
/// `verify-login` from the same session.
pub async fn login<U, S, M>(
    req: HttpRequest,
    state: web::Data<AppState<U, S, M>>,
    session: ClientSession,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    S: EphemeralStore + 'static,
    M: Mailer + 'static,
{
    let body = body.into_inner();
    body.validate()?;

    let ctx = request_context(&req, &session);
    state
        .auth_service
        .process(
            &ctx,
            AuthFlow::LoginStart {
                email: body.email,
                password: body.password,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse::new(CODE_SENT_MESSAGE)))
}

/// Handler for POST /api/v1/auth/verify-login
pub async fn verify_login<U, S, M>(
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
        .process(&ctx, AuthFlow::VerifyLogin { code: body.code })
        .await?;

    Ok(HttpResponse::Ok().json(verified(outcome, "Code verified successfully")?))
}
