//! Transport-level request throttle
//!
//! Caps requests per (scope, client address) inside a fixed window, on top of
//! the abuse guard the flows apply themselves. Counters live in the same
//! [`EphemeralStore`] as the rest of the verification state.

use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::RETRY_AFTER,
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use tracing::{error, warn};

use tg_core::{DomainResult, EphemeralStore, ErrorResponse};
use tg_shared::config::ThrottleConfig;

use super::session::ClientAddress;

/// Outcome of one throttle check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleStatus {
    Allowed { remaining: u32 },
    Exceeded { retry_after_seconds: u64 },
}

/// Middleware factory; one instance per throttled scope
pub struct Throttle<T: EphemeralStore> {
    scope: &'static str,
    store: Arc<T>,
    config: ThrottleConfig,
}

impl<T: EphemeralStore> Throttle<T> {
    pub fn new(scope: &'static str, store: Arc<T>, config: ThrottleConfig) -> Self {
        Self {
            scope,
            store,
            config,
        }
    }
}

fn throttle_key(scope: &str, address: &str) -> String {
    format!("throttle:{}:{}", scope, address)
}

/// Count one request and report whether it fits in the window
pub async fn check<T: EphemeralStore>(
    store: &T,
    scope: &str,
    address: &str,
    config: &ThrottleConfig,
) -> DomainResult<ThrottleStatus> {
    let key = throttle_key(scope, address);
    let count = store.increment(&key, config.window_seconds).await?;
    let limit = i64::from(config.requests);

    if count > limit {
        let retry_after_seconds = store
            .ttl(&key)
            .await?
            .map(|ttl| ttl.max(1) as u64)
            .unwrap_or(config.window_seconds);
        return Ok(ThrottleStatus::Exceeded {
            retry_after_seconds,
        });
    }

    Ok(ThrottleStatus::Allowed {
        remaining: (limit - count) as u32,
    })
}

fn throttled(retry_after_seconds: u64) -> Error {
    let body = ErrorResponse::new(
        "THROTTLED",
        format!(
            "Request was throttled. Expected available in {} seconds.",
            retry_after_seconds
        ),
    );
    let response = HttpResponse::TooManyRequests()
        .insert_header((RETRY_AFTER, retry_after_seconds.to_string()))
        .json(body);
    InternalError::from_response("throttled", response).into()
}

impl<S, B, T> Transform<S, ServiceRequest> for Throttle<T>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    T: EphemeralStore + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ThrottleMiddleware<S, T>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ThrottleMiddleware {
            service: Rc::new(service),
            scope: self.scope,
            store: self.store.clone(),
            config: self.config.clone(),
        }))
    }
}

pub struct ThrottleMiddleware<S, T: EphemeralStore> {
    service: Rc<S>,
    scope: &'static str,
    store: Arc<T>,
    config: ThrottleConfig,
}

impl<S, B, T> Service<ServiceRequest> for ThrottleMiddleware<S, T>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    T: EphemeralStore + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let store = self.store.clone();
        let scope = self.scope;
        let config = self.config.clone();

        Box::pin(async move {
            let address = ClientAddress::of(req.request());

            match check(store.as_ref(), scope, &address, &config).await {
                Ok(ThrottleStatus::Allowed { .. }) => {}
                Ok(ThrottleStatus::Exceeded {
                    retry_after_seconds,
                }) => {
                    warn!(
                        scope,
                        client_address = %address,
                        retry_after_seconds,
                        event = "request_throttled",
                        "Request throttled"
                    );
                    return Err(throttled(retry_after_seconds));
                }
                // The flows hit the same store right after; let them report the outage
                Err(e) => {
                    error!(scope, error = %e, event = "throttle_check_failed", "Throttle check failed");
                }
            }

            service.call(req).await
        })
    }
}
