//! Login and session handling.
//!
//! Handles password checks against the configured users, session token
//! generation and validation, and the session cookie.
//!
//! ```text
//! POST /login ──► UserDirectory::authenticate ──► SessionManager::issue
//!                                                        │
//!                 Set-Cookie: barbearia_session=<jwt> ◄──┘
//!
//! GET /historico ──► Session extractor ──► SessionManager::validate
//!                         │ missing / bad / expired
//!                         └──► 303 /login
//! ```

use std::collections::HashMap;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{Redirect, Response};
use barber_core::validation::normalize_username;
use barber_core::{CoreError, Role, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::UserEntry;
use crate::error::WebError;
use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "barbearia_session";

// =============================================================================
// Users
// =============================================================================

#[derive(Clone)]
enum Credential {
    Plain(String),
    /// argon2 PHC string
    Hashed(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Plain(_) => f.write_str("Plain(<redacted>)"),
            Credential::Hashed(_) => f.write_str("Hashed(<redacted>)"),
        }
    }
}

impl Credential {
    fn parse(raw: &str) -> Self {
        if raw.starts_with("$argon2") {
            Credential::Hashed(raw.to_string())
        } else {
            Credential::Plain(raw.trim().to_string())
        }
    }

    fn matches(&self, password: &str) -> bool {
        match self {
            Credential::Plain(expected) => expected == password,
            Credential::Hashed(phc) => PasswordHash::new(phc)
                .map(|hash| {
                    Argon2::default()
                        .verify_password(password.as_bytes(), &hash)
                        .is_ok()
                })
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    credential: Credential,
}

/// The accounts allowed to log in, keyed by normalized username.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    accounts: HashMap<String, Account>,
}

impl UserDirectory {
    /// Builds the directory from configuration entries.
    pub fn from_entries(entries: &[UserEntry]) -> Self {
        let accounts = entries
            .iter()
            .map(|entry| {
                let username = normalize_username(&entry.username);
                let display_name = entry
                    .display_name
                    .clone()
                    .unwrap_or_else(|| username.clone());
                let account = Account {
                    user: User {
                        username: username.clone(),
                        display_name,
                        role: entry.role,
                    },
                    credential: Credential::parse(&entry.password),
                };
                (username, account)
            })
            .collect();

        UserDirectory { accounts }
    }

    /// Looks a user up by login name (case and surrounding spaces ignored).
    pub fn get(&self, username: &str) -> Option<&User> {
        self.accounts
            .get(&normalize_username(username))
            .map(|account| &account.user)
    }

    /// Checks a login attempt.
    ///
    /// The password is trimmed before comparison.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, CoreError> {
        let account = self
            .accounts
            .get(&normalize_username(username))
            .ok_or(CoreError::InvalidCredentials)?;

        if account.credential.matches(password.trim()) {
            Ok(account.user.clone())
        } else {
            Err(CoreError::InvalidCredentials)
        }
    }

    /// Every user, sorted by username, for the barber selector.
    pub fn all(&self) -> Vec<&User> {
        let mut users: Vec<&User> = self.accounts.values().map(|a| &a.user).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }
}

// =============================================================================
// Session Tokens
// =============================================================================

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,

    /// Role at login time
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Token ID
    pub jti: String,
}

/// Signs and checks session tokens.
#[derive(Clone)]
pub struct SessionManager {
    secret: String,
    ttl_secs: i64,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl SessionManager {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        SessionManager {
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Issues a token for a freshly authenticated user.
    pub fn issue(&self, user: &User) -> Result<String, WebError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| WebError::Internal(format!("Failed to sign session: {}", e)))
    }

    /// Validates signature and expiry.
    pub fn validate(&self, token: &str) -> Result<Claims, WebError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| WebError::Unauthorized(format!("Invalid session: {}", e)))
    }

    /// `Set-Cookie` value carrying a token.
    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.ttl_secs
        )
    }
}

// =============================================================================
// Cookies
// =============================================================================

/// `Set-Cookie` value that removes a cookie.
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub fn append_set_cookie_header(response: &mut Response, cookie: &str) -> Result<(), WebError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| WebError::Internal(format!("Invalid cookie header: {}", e)))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}

pub fn extract_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    for part in raw.split(';') {
        let mut pieces = part.trim().splitn(2, '=');
        let key = pieces.next()?.trim();
        let value = pieces.next().unwrap_or_default().trim();

        if key == cookie_name && !value.is_empty() {
            return Some(value.to_string());
        }
    }

    None
}

// =============================================================================
// Session Extractor
// =============================================================================

/// The logged-in user of a request.
///
/// Handlers that take a `Session` are only reached with a valid cookie;
/// anything else is redirected to `/login`.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Fails with `Forbidden` unless the user is an admin.
    pub fn require_admin(&self) -> Result<(), WebError> {
        if self.user.role.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Forbidden {
                required: Role::Admin.to_string(),
            }
            .into())
        }
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let login = || Redirect::to("/login");

        let token = extract_cookie_value(&parts.headers, SESSION_COOKIE).ok_or_else(login)?;
        let claims = state.sessions.validate(&token).map_err(|err| {
            debug!(error = %err, "Rejecting session cookie");
            login()
        })?;

        // The account may have been removed from the config since login.
        let user = state.users.get(&claims.sub).cloned().ok_or_else(login)?;

        Ok(Session { user })
    }
}
