//! Account routes; every handler requires a valid access token

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use tg_core::{EphemeralStore, Mailer, UserRepository};
use tg_shared::types::MessageResponse;
use tg_shared::validation::is_valid_email;

use crate::app::AppState;
use crate::dto::users::{ChangePasswordRequest, ListUsersQuery, UpdateProfileRequest};
use crate::handlers::{ApiError, ApiResult};
use crate::middleware::AuthContext;

/// Handler for GET /api/v1/users (staff only)
pub async fn list_users<U, S, M>(
    auth: AuthContext,
    state: web::Data<AppState<U, S, M>>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    S: EphemeralStore + 'static,
    M: Mailer + 'static,
{
    let query = query.into_inner();
    query.validate()?;

    let page = state
        .account_service
        .list(auth.user_id, query.into())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Handler for GET /api/v1/users/{id}
pub async fn get_user<U, S, M>(
    auth: AuthContext,
    state: web::Data<AppState<U, S, M>>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    S: EphemeralStore + 'static,
    M: Mailer + 'static,
{
    let profile = state
        .account_service
        .detail(auth.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Handler for PATCH /api/v1/users/{id}
pub async fn update_user<U, S, M>(
    auth: AuthContext,
    state: web::Data<AppState<U, S, M>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    S: EphemeralStore + 'static,
    M: Mailer + 'static,
{
    let body = body.into_inner();
    body.validate()?;
    if let Some(email) = &body.email {
        if !is_valid_email(email, &state.settings.allowed_email_domains) {
            return Err(ApiError::field("email", "Email domain is not allowed."));
        }
    }

    let profile = state
        .account_service
        .update(auth.user_id, path.into_inner(), body.into())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Handler for POST /api/v1/users/{id}/change-password
pub async fn change_password<U, S, M>(
    auth: AuthContext,
    state: web::Data<AppState<U, S, M>>,
    path: web::Path<Uuid>,
    body: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    S: EphemeralStore + 'static,
    M: Mailer + 'static,
{
    let body = body.into_inner();
    body.validate()?;

    state
        .account_service
        .change_password(auth.user_id, path.into_inner(), body.into())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Password changed successfully")))
}

/// Handler for DELETE /api/v1/users/{id}
pub async fn delete_user<U, S, M>(
    auth: AuthContext,
    state: web::Data<AppState<U, S, M>>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    S: EphemeralStore + 'static,
    M: Mailer + 'static,
{
    state
        .account_service
        .delete(auth.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
