//! Main token service implementation

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{Claims, TokenPair, TokenType, JWT_AUDIENCE, JWT_ISSUER};
use crate::domain::entities::User;
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Service minting and verifying JWTs
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry(&self) -> i64 {
        self.config.access_token_expiry_seconds
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_token_expiry(&self) -> i64 {
        self.config.refresh_token_expiry_seconds
    }

    /// Mint an access/refresh pair for `user`
    ///
    /// Stateless: calling it repeatedly only produces new tokens.
    pub fn issue_for(&self, user: &User) -> Result<TokenPair, DomainError> {
        let access = Claims::for_user(
            user,
            TokenType::Access,
            self.config.access_token_expiry_seconds,
        );
        let refresh = Claims::for_user(
            user,
            TokenType::Refresh,
            self.config.refresh_token_expiry_seconds,
        );

        Ok(TokenPair::new(
            self.encode_jwt(&access)?,
            self.encode_jwt(&refresh)?,
            self.config.access_token_expiry_seconds,
        ))
    }

    /// Verify a bearer access token and return its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError)` - Token is expired, not yet valid, malformed or a refresh token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.verify(token, TokenType::Access)
    }

    /// Verify a refresh token and return its claims
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.verify(token, TokenType::Refresh)
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, DomainError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                ErrorKind::ImmatureSignature => DomainError::Token(TokenError::TokenNotYetValid),
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                    DomainError::Token(TokenError::InvalidClaims)
                }
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            })?;

        if token_data.claims.token_type != expected {
            return Err(DomainError::Token(TokenError::WrongTokenType {
                expected: expected.as_str().to_string(),
            }));
        }

        Ok(token_data.claims)
    }

    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        encode(&Header::new(self.config.algorithm), claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }
}
