//! Session model and signed-token codec
//!
//! A session is issued once at login and then travels with every request as
//! an HS256-signed token, either in the `salon_session` cookie or in an
//! `Authorization: Bearer` header. It is decoded per request and never cached.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Name of the cookie carrying the signed session
pub const SESSION_COOKIE: &str = "salon_session";

// Ten years; keeps `iat + ttl` inside the representable range
const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Authenticated dashboard user and the upstream bearer token issued at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub bearer_token: String,
    pub display_name: String,
    pub email: String,
}

impl Session {
    /// Upstream bearer token, or `None` when it is empty
    pub fn bearer(&self) -> Option<&str> {
        if self.bearer_token.is_empty() {
            None
        } else {
            Some(&self.bearer_token)
        }
    }
}

/// Claims stored in the signed session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub id: String,
    /// Upstream bearer token
    pub token: String,
    pub name: String,
    pub email: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl SessionClaims {
    pub fn into_session(self) -> Session {
        Session {
            user_id: self.id,
            bearer_token: self.token,
            display_name: self.name,
            email: self.email,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// A freshly signed session token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionCodec {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
        }
    }

    /// Session lifetime in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Sign a session valid from now
    pub fn issue(&self, session: &Session) -> SessionResult<IssuedSession> {
        self.issue_at(session, Utc::now())
    }

    /// Sign a session as if issued at `now`
    pub fn issue_at(&self, session: &Session, now: DateTime<Utc>) -> SessionResult<IssuedSession> {
        if session.bearer().is_none() {
            return Err(SessionError::MissingToken);
        }

        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            id: session.user_id.clone(),
            token: session.bearer_token.clone(),
            name: session.display_name.clone(),
            email: session.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(SessionError::Encode)?;

        Ok(IssuedSession { token, expires_at })
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> SessionResult<SessionClaims> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(SessionError::Invalid)?
            .claims;

        if claims.token.is_empty() {
            return Err(SessionError::MissingToken);
        }

        Ok(claims)
    }

    /// Verify a token and return the session it carries
    pub fn decode(&self, token: &str) -> SessionResult<Session> {
        self.verify(token).map(SessionClaims::into_session)
    }
}
