//! Flow inputs

/// Per-request facts the flows need besides the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Opaque id of the caller's session; scopes pending actions
    pub session_id: String,
    /// Caller network address, used as an abuse-guard key
    pub client_address: String,
}

impl RequestContext {
    pub fn new(session_id: impl Into<String>, client_address: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            client_address: client_address.into(),
        }
    }
}

/// Fields of a registration request, already format-validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

/// The four verification flows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFlow {
    LoginStart { email: String, password: String },
    RegisterStart(RegistrationRequest),
    VerifyLogin { code: String },
    VerifyRegister { code: String },
}

impl AuthFlow {
    /// Name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginStart { .. } => "login_start",
            Self::RegisterStart(_) => "register_start",
            Self::VerifyLogin { .. } => "verify_login",
            Self::VerifyRegister { .. } => "verify_register",
        }
    }
}
