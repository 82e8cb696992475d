// ABOUTME: JWT validation for identity-provider tokens and local development token issuing
// ABOUTME: Extracts bearer tokens from the Authorization header or the auth_token cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! Authentication boundary
//!
//! The identity provider issues HS256 tokens whose `sub` claim is the opaque
//! authenticated-user id. This module only proves who the caller is; what the
//! caller may see is decided by [`crate::context::CoachContext`].

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::errors::{AppError, AppResult};

/// Cookie carrying the session token for browser clients
pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// Claims carried by an identity token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated-user id (the coach's `auth_uid`)
    pub sub: String,
    /// Email address, when the provider includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch)
    pub exp: i64,
}

/// Identity proven by a valid token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// Authenticated-user id
    pub auth_uid: String,
    /// Email claim, if present
    pub email: Option<String>,
}

/// Validates and issues HS256 tokens with a shared secret
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    audience: Option<String>,
    token_ttl: Duration,
}

impl AuthManager {
    /// Create a manager from a shared secret
    #[must_use]
    pub fn new(secret: &[u8], audience: Option<String>, token_ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            audience,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Create a manager from authentication settings
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.jwt_audience.clone(),
            config.token_ttl_hours,
        )
    }

    /// Issue a token for an identity
    ///
    /// Used by the admin CLI and tests; production tokens come from the
    /// identity provider.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails
    pub fn generate_token(&self, auth_uid: &str, email: Option<&str>) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: auth_uid.to_owned(),
            email: email.map(str::to_owned),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Validate a token and return the identity it proves
    ///
    /// # Errors
    ///
    /// Returns `AuthExpired` for expired tokens and `AuthInvalid` for any
    /// other validation failure
    pub fn validate_token(&self, token: &str) -> AppResult<AuthResult> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        if data.claims.sub.trim().is_empty() {
            return Err(AppError::auth_invalid("Token has no subject"));
        }

        Ok(AuthResult {
            auth_uid: data.claims.sub,
            email: data.claims.email,
        })
    }

    /// Authenticate a request from its headers
    ///
    /// Returns `Ok(None)` when no credentials are present.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are present but invalid
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> AppResult<Option<AuthResult>> {
        extract_token(headers)?
            .map(|token| self.validate_token(&token))
            .transpose()
    }
}

/// Read a cookie value from request headers
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name.trim() == cookie_name).then(|| value.trim().to_owned())
        })
}

/// Token from the `Authorization: Bearer` header, falling back to the auth cookie
///
/// # Errors
///
/// Returns `AuthInvalid` if an Authorization header is present but is not a
/// bearer token
pub fn extract_token(headers: &HeaderMap) -> AppResult<Option<String>> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AppError::auth_invalid("Authorization header is not valid UTF-8"))?;
        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::auth_invalid("Authorization header must be a Bearer token"))?;
        return Ok(Some(token.to_owned()));
    }

    Ok(get_cookie_value(headers, AUTH_COOKIE_NAME).filter(|t| !t.is_empty()))
}
