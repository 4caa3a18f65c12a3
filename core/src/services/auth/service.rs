//! Main authentication service implementation

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use tg_shared::utils::mask_phone_number;
use tg_shared::validation::mask_email;

use crate::domain::entities::{PendingAction, PendingActionKind, PendingRegistration, User};
use crate::domain::value_objects::{AuthResponse, FlowOutcome, UserProfile};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{UserField, UserRepository};
use crate::services::password::PasswordHasher;
use crate::services::session::SessionBridge;
use crate::services::token::TokenService;
use crate::services::verification::{
    AbuseGuard, CodeGenerator, EphemeralStore, Mailer, PendingActionStore,
};

use super::config::AuthServiceConfig;
use super::flow::{AuthFlow, RegistrationRequest, RequestContext};

/// Drives the login and registration flows
///
/// Every component that keeps state shares the one injected store.
pub struct AuthService<U, S, M>
where
    U: UserRepository,
    S: EphemeralStore,
    M: Mailer,
{
    user_repository: Arc<U>,
    mailer: Arc<M>,
    codes: CodeGenerator<S>,
    guard: AbuseGuard<S>,
    pending: PendingActionStore<S>,
    sessions: SessionBridge<S>,
    passwords: PasswordHasher,
    config: AuthServiceConfig,
}

impl<U, S, M> AuthService<U, S, M>
where
    U: UserRepository,
    S: EphemeralStore,
    M: Mailer,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Account directory
    /// * `store` - Ephemeral store for codes, counters, pending actions and sessions
    /// * `mailer` - Delivery of verification codes
    /// * `token_service` - JWT minting
    /// * `passwords` - bcrypt hasher
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        store: Arc<S>,
        mailer: Arc<M>,
        token_service: Arc<TokenService>,
        passwords: PasswordHasher,
        config: AuthServiceConfig,
    ) -> Self {
        let verification = config.verification.clone();
        Self {
            user_repository,
            mailer,
            codes: CodeGenerator::new(store.clone(), verification.clone()),
            guard: AbuseGuard::new(store.clone(), verification.clone()),
            pending: PendingActionStore::new(store.clone(), verification),
            sessions: SessionBridge::new(store, token_service),
            passwords,
            config,
        }
    }

    /// Run one flow to completion
    pub async fn process(&self, ctx: &RequestContext, flow: AuthFlow) -> DomainResult<FlowOutcome> {
        let name = flow.name();
        let result = match flow {
            AuthFlow::LoginStart { email, password } => self.login_start(ctx, &email, &password).await,
            AuthFlow::RegisterStart(request) => self.register_start(ctx, request).await,
            AuthFlow::VerifyLogin { code } => self.verify_login(ctx, &code).await,
            AuthFlow::VerifyRegister { code } => self.verify_register(ctx, &code).await,
        };

        if let Err(e) = &result {
            info!(
                flow = name,
                client_address = %ctx.client_address,
                error = %e,
                event = "auth_flow_rejected",
                "Authentication flow rejected"
            );
        }
        result
    }

    /// End an authenticated session and drop its pending actions
    pub async fn logout(&self, ctx: &RequestContext) -> DomainResult<()> {
        self.sessions.end(&ctx.session_id).await?;
        self.pending.clear_session(&ctx.session_id).await
    }

    async fn login_start(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> DomainResult<FlowOutcome> {
        let identifiers = [email];
        self.guard
            .ensure_not_blocked(&identifiers, &ctx.client_address)
            .await?;

        let user = self.user_repository.find_by_email(email).await?;
        let authenticated = match &user {
            Some(user) if user.can_login() => {
                self.passwords.verify(password, &user.password_hash).await?
            }
            _ => false,
        };

        // Every start counts toward the budget, successful or not
        self.count_attempt(&identifiers, &ctx.client_address).await?;

        let user = match user {
            Some(user) if authenticated => user,
            _ => {
                warn!(
                    email = %mask_email(email),
                    event = "login_credentials_rejected",
                    "Login start with invalid credentials"
                );
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        self.pending
            .put(
                &ctx.session_id,
                &PendingAction::Login {
                    email: user.email.clone(),
                },
            )
            .await?;
        self.send_code(&user.email).await?;

        info!(user_id = %user.id, event = "login_code_sent", "Login code sent");
        Ok(FlowOutcome::CodeSent)
    }

    async fn register_start(
        &self,
        ctx: &RequestContext,
        request: RegistrationRequest,
    ) -> DomainResult<FlowOutcome> {
        let identifiers = [request.email.as_str(), request.phone_number.as_str()];
        self.guard
            .ensure_not_blocked(&identifiers, &ctx.client_address)
            .await?;

        for (field, value) in [
            (UserField::Email, &request.email),
            (UserField::PhoneNumber, &request.phone_number),
            (UserField::Username, &request.username),
        ] {
            if self.user_repository.exists(field, value, None).await? {
                return Err(AuthError::DuplicateIdentity {
                    field: field.as_str().to_string(),
                }
                .into());
            }
        }

        // Only starts that pass the duplicate checks count toward the budget
        self.count_attempt(&identifiers, &ctx.client_address).await?;

        let password_hash = self.passwords.hash(&request.password).await?;
        let registration = PendingRegistration {
            email: request.email,
            phone_number: request.phone_number,
            username: request.username,
            password_hash,
        };
        let email = registration.email.clone();
        let phone_number = registration.phone_number.clone();

        self.pending
            .put(&ctx.session_id, &PendingAction::Register(registration))
            .await?;
        self.send_code(&email).await?;

        info!(
            email = %mask_email(&email),
            phone_number = %mask_phone_number(&phone_number),
            event = "register_code_sent",
            "Registration code sent"
        );
        Ok(FlowOutcome::CodeSent)
    }

    async fn verify_login(&self, ctx: &RequestContext, code: &str) -> DomainResult<FlowOutcome> {
        let Some(action) = self
            .pending
            .get(&ctx.session_id, PendingActionKind::Login)
            .await?
        else {
            return Err(AuthError::SessionExpired.into());
        };
        let email = action.email().to_string();
        let identifiers = [email.as_str()];

        self.confirm_code(&identifiers, &ctx.client_address, &email, code)
            .await?;

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) if user.can_login() => user,
            _ => return Err(AuthError::InvalidCredentials.into()),
        };

        let response = self
            .complete(ctx, &identifiers, &user, PendingActionKind::Login)
            .await?;
        info!(user_id = %user.id, event = "login_verified", "Login verified");
        Ok(FlowOutcome::Authenticated(response))
    }

    async fn verify_register(&self, ctx: &RequestContext, code: &str) -> DomainResult<FlowOutcome> {
        let Some(PendingAction::Register(registration)) = self
            .pending
            .get(&ctx.session_id, PendingActionKind::Register)
            .await?
        else {
            return Err(AuthError::SessionExpired.into());
        };
        let identifiers = [
            registration.email.as_str(),
            registration.phone_number.as_str(),
        ];

        self.confirm_code(&identifiers, &ctx.client_address, &registration.email, code)
            .await?;

        let user = self
            .user_repository
            .create(User::new(
                registration.username.clone(),
                registration.email.clone(),
                registration.phone_number.clone(),
                registration.password_hash.clone(),
            ))
            .await?;

        let response = self
            .complete(ctx, &identifiers, &user, PendingActionKind::Register)
            .await?;
        info!(user_id = %user.id, event = "registration_verified", "Account created and verified");
        Ok(FlowOutcome::Authenticated(response))
    }

    /// Record an attempt; reject it if it pushed any key over the threshold
    async fn count_attempt(&self, identifiers: &[&str], client_address: &str) -> DomainResult<()> {
        let over_limit = self.guard.record_failure(identifiers, client_address).await?;
        if over_limit.is_empty() {
            return Ok(());
        }
        Err(self.too_many_attempts(identifiers, client_address).await)
    }

    async fn too_many_attempts(&self, identifiers: &[&str], client_address: &str) -> DomainError {
        let retry_after_seconds = match self.guard.retry_after(identifiers, client_address).await {
            Ok(Some(seconds)) => seconds,
            Ok(None) => self.config.verification.block_seconds as i64,
            Err(e) => return e,
        };
        AuthError::TooManyAttempts {
            retry_after_seconds,
        }
        .into()
    }

    /// Check the entered code against the live one; failures count against the guard
    async fn confirm_code(
        &self,
        identifiers: &[&str],
        client_address: &str,
        email: &str,
        entered: &str,
    ) -> DomainResult<()> {
        self.guard
            .ensure_not_blocked(identifiers, client_address)
            .await?;

        let valid = match self.codes.lookup(email).await? {
            Some(issued) => {
                issued.matches(entered) && issued.is_fresh_at(Utc::now(), self.codes.ttl_seconds())
            }
            None => false,
        };
        if valid {
            return Ok(());
        }

        self.guard.record_failure(identifiers, client_address).await?;
        warn!(
            email = %mask_email(email),
            event = "otp_rejected",
            "Verification code mismatch or expired"
        );
        Err(AuthError::InvalidOrExpiredCode.into())
    }

    /// Authenticate the session and clear the flow state
    async fn complete(
        &self,
        ctx: &RequestContext,
        identifiers: &[&str],
        user: &User,
        kind: PendingActionKind,
    ) -> DomainResult<AuthResponse> {
        let tokens = self.sessions.establish(&ctx.session_id, user).await?;
        self.guard.reset(identifiers, &ctx.client_address).await?;
        self.codes.revoke(&user.email).await?;
        self.pending.clear(&ctx.session_id, kind).await?;

        Ok(AuthResponse {
            tokens,
            user: UserProfile::from(user),
        })
    }

    /// Issue (or reuse) the code for `email` and mail it; delivery failures are logged only
    async fn send_code(&self, email: &str) -> DomainResult<()> {
        let issued = self.codes.issue(email).await?;
        let body = format!("Your verification code is: {}", issued.code);

        if let Err(e) = self
            .mailer
            .send(email, &self.config.mail_subject, &body)
            .await
        {
            warn!(
                email = %mask_email(email),
                error = %e,
                event = "otp_delivery_failed",
                "Verification mail could not be sent"
            );
        }
        Ok(())
    }
}
