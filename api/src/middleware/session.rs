//! Caller session and address resolution
//!
//! Pending login and registration actions are keyed by an opaque session id.
//! [`SessionLayer`] reads it from the session cookie or the `X-Session-Id`
//! header and mints a fresh one when neither is present; new ids are handed
//! back on the response through both channels.

use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use actix_web::{
    cookie::{Cookie, SameSite},
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use tg_shared::config::SessionConfig;

pub const SESSION_HEADER: &str = "x-session-id";

const MAX_SESSION_ID_LENGTH: usize = 128;

/// Session id of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSession {
    pub id: String,
    /// Whether the id was minted for this request
    pub is_new: bool,
}

impl ClientSession {
    fn resolve(req: &ServiceRequest, cookie_name: &str) -> Self {
        let presented = req
            .cookie(cookie_name)
            .map(|cookie| cookie.value().to_string())
            .or_else(|| {
                req.headers()
                    .get(SESSION_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            })
            .map(|id| id.trim().to_string())
            .filter(|id| is_acceptable_id(id));

        match presented {
            Some(id) => Self { id, is_new: false },
            None => Self {
                id: Uuid::new_v4().simple().to_string(),
                is_new: true,
            },
        }
    }
}

/// Ids end up inside store keys, so only a conservative alphabet is accepted
fn is_acceptable_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LENGTH
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl FromRequest for ClientSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = req.extensions().get::<ClientSession>().cloned();
        ready(Ok(session.unwrap_or_else(|| Self {
            id: Uuid::new_v4().simple().to_string(),
            is_new: true,
        })))
    }
}

/// Network address of the caller, resolved once by [`SessionLayer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress(pub String);

impl ClientAddress {
    /// Forwarding headers count only when the peer is a trusted proxy:
    /// first `X-Forwarded-For` entry, then `X-Real-IP`, then the peer address
    pub fn resolve(req: &HttpRequest, trusted_proxies: &[String]) -> Self {
        let peer = req.peer_addr().map(|addr| addr.ip().to_string());
        let forwarded = peer
            .as_deref()
            .filter(|peer| is_trusted_proxy(peer, trusted_proxies))
            .and_then(|_| forwarded_address(req));

        Self(
            forwarded
                .or(peer)
                .unwrap_or_else(|| "unknown".to_string()),
        )
    }

    /// Address attached by [`SessionLayer`], or the bare peer address
    pub fn of(req: &HttpRequest) -> String {
        req.extensions()
            .get::<ClientAddress>()
            .map(|address| address.0.clone())
            .unwrap_or_else(|| Self::resolve(req, &[]).0)
    }
}

fn is_trusted_proxy(peer: &str, trusted_proxies: &[String]) -> bool {
    trusted_proxies.iter().any(|trusted| trusted == peer)
}

fn forwarded_address(req: &HttpRequest) -> Option<String> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    header("x-forwarded-for")
        .and_then(|value| {
            value
                .split(',')
                .next()
                .map(|first| first.trim().to_string())
                .filter(|first| !first.is_empty())
        })
        .or_else(|| header("x-real-ip"))
}

/// Middleware factory attaching a [`ClientSession`] to every request
pub struct SessionLayer {
    config: SessionConfig,
    trusted_proxies: Rc<[String]>,
}

impl SessionLayer {
    pub fn new(config: SessionConfig, trusted_proxies: Vec<String>) -> Self {
        Self {
            config,
            trusted_proxies: trusted_proxies.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddleware {
            service: Rc::new(service),
            config: self.config.clone(),
            trusted_proxies: Rc::clone(&self.trusted_proxies),
        }))
    }
}

pub struct SessionMiddleware<S> {
    service: Rc<S>,
    config: SessionConfig,
    trusted_proxies: Rc<[String]>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let config = self.config.clone();
        let address = ClientAddress::resolve(req.request(), &self.trusted_proxies);

        Box::pin(async move {
            let session = ClientSession::resolve(&req, &config.cookie_name);
            req.extensions_mut().insert(session.clone());
            req.extensions_mut().insert(address);

            let mut res = service.call(req).await?;
            if session.is_new {
                let cookie = Cookie::build(config.cookie_name.clone(), session.id.clone())
                    .path("/")
                    .http_only(true)
                    .secure(config.secure)
                    .same_site(SameSite::Lax)
                    .finish();
                if let Err(e) = res.response_mut().add_cookie(&cookie) {
                    warn!(error = %e, event = "session_cookie_failed", "Could not set session cookie");
                }
                if let Ok(value) = HeaderValue::from_str(&session.id) {
                    res.headers_mut()
                        .insert(HeaderName::from_static(SESSION_HEADER), value);
                }
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn trusted() -> Vec<String> {
        vec!["192.0.2.1".to_string()]
    }

    #[test]
    fn test_client_address_precedence_behind_trusted_proxy() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .peer_addr("192.0.2.1:4000".parse().unwrap())
            .to_http_request();
        assert_eq!(ClientAddress::resolve(&req, &trusted()).0, "203.0.113.7");

        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .peer_addr("192.0.2.1:4000".parse().unwrap())
            .to_http_request();
        assert_eq!(ClientAddress::resolve(&req, &trusted()).0, "198.51.100.2");

        let req = TestRequest::default()
            .peer_addr("192.0.2.1:4000".parse().unwrap())
            .to_http_request();
        assert_eq!(ClientAddress::resolve(&req, &trusted()).0, "192.0.2.1");

        let req = TestRequest::default().to_http_request();
        assert_eq!(ClientAddress::resolve(&req, &trusted()).0, "unknown");
    }

    #[test]
    fn test_forwarding_headers_ignored_from_untrusted_peer() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .peer_addr("198.51.100.50:4000".parse().unwrap())
            .to_http_request();
        assert_eq!(ClientAddress::resolve(&req, &trusted()).0, "198.51.100.50");

        // No peer at all: headers cannot be vouched for
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .to_http_request();
        assert_eq!(ClientAddress::resolve(&req, &trusted()).0, "unknown");
    }

    #[test]
    fn test_address_falls_back_to_peer_without_layer() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .peer_addr("192.0.2.1:4000".parse().unwrap())
            .to_http_request();
        assert_eq!(ClientAddress::of(&req), "192.0.2.1");

        req.extensions_mut()
            .insert(ClientAddress("203.0.113.7".to_string()));
        assert_eq!(ClientAddress::of(&req), "203.0.113.7");
    }

    #[test]
    fn test_session_resolution() {
        let req = TestRequest::default()
            .cookie(Cookie::new("tg_sid", "abc123"))
            .insert_header((SESSION_HEADER, "from-header"))
            .to_srv_request();
        assert_eq!(
            ClientSession::resolve(&req, "tg_sid"),
            ClientSession { id: "abc123".to_string(), is_new: false }
        );

        let req = TestRequest::default()
            .insert_header((SESSION_HEADER, "from-header"))
            .to_srv_request();
        assert_eq!(ClientSession::resolve(&req, "tg_sid").id, "from-header");

        let req = TestRequest::default()
            .insert_header((SESSION_HEADER, "pending:login:x"))
            .to_srv_request();
        let session = ClientSession::resolve(&req, "tg_sid");
        assert!(session.is_new);
        assert_ne!(session.id, "pending:login:x");
    }
}
