use actix_web::{web, HttpRequest, HttpResponse};

use tg_core::{EphemeralStore, Mailer, UserRepository};
use tg_shared::types::MessageResponse;

use crate::app::AppState;
use crate::handlers::ApiResult;
use crate::middleware::ClientSession;

use super::request_context;

/// Handler for POST /api/v1/auth/logout
///
/// Ends the session opened by a verify step. A session that never verified
/// gets `NOT_LOGGED_IN`.
pub async fn logout<U, S, M>(
    req: HttpRequest,
    state: web::Data<AppState<U, S, M>>,
    session: ClientSession,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    S: EphemeralStore + 'static,
    M: Mailer + 'static,
{
    let ctx = request_context(&req, &session);
    state.auth_service.logout(&ctx).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("You have been logged out successfully")))
}
