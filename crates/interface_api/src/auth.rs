//! Authentication and authorization
//!
//! HS256 bearer tokens carry the user id, a single role and, for agency
//! users, the agency the user belongs to.

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::{AgencyId, UserId};
use domain_submission::Submission;

use crate::error::ApiError;

/// Portal roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SystemAdmin,
    AgencyAdmin,
    AgencyUser,
}

impl Role {
    pub fn is_agency(&self) -> bool {
        matches!(self, Role::AgencyAdmin | Role::AgencyUser)
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<AgencyId>,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Forbidden - {0}")]
    Forbidden(&'static str),
}

impl Claims {
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        match self.role {
            Role::SystemAdmin => Ok(()),
            _ => Err(AuthError::Forbidden("Admin access required")),
        }
    }

    /// System admins and agency admins
    pub fn require_any_admin(&self) -> Result<(), AuthError> {
        match self.role {
            Role::SystemAdmin | Role::AgencyAdmin => Ok(()),
            Role::AgencyUser => Err(AuthError::Forbidden("Admin access required")),
        }
    }

    /// The caller's agency; fails for admins and for tokens without one
    pub fn require_agency(&self) -> Result<AgencyId, AuthError> {
        match (self.role.is_agency(), self.agency_id) {
            (true, Some(agency_id)) => Ok(agency_id),
            _ => Err(AuthError::Forbidden("Agency access required")),
        }
    }

    /// System admins see everything; agency users only their own submissions
    pub fn ensure_agency_owns(&self, submission: &Submission) -> Result<(), AuthError> {
        if self.role == Role::SystemAdmin {
            return Ok(());
        }
        match self.agency_id {
            Some(agency_id) if agency_id == submission.agency_id() => Ok(()),
            _ => Err(AuthError::Forbidden("Submission does not belong to your agency")),
        }
    }
}

/// Issues a token valid for `expiration_secs`
pub fn create_token(
    user_id: UserId,
    role: Role,
    agency_id: Option<AgencyId>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let lifetime = i64::try_from(expiration_secs).map_err(|_| AuthError::InvalidToken)?;
    let claims = Claims {
        sub: user_id.as_uuid().to_string(),
        role,
        agency_id,
        exp: (now + Duration::seconds(lifetime)).timestamp(),
        iat: now.timestamp(),
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| AuthError::InvalidToken)
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
}

/// Claims put in the request extensions by the auth middleware
#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Claims {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_roundtrip_keeps_role_and_agency() {
        let agency = AgencyId::new();
        let user = UserId::new();
        let token = create_token(user, Role::AgencyUser, Some(agency), SECRET, 60).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.role, Role::AgencyUser);
        assert_eq!(claims.require_agency().unwrap(), agency);
        assert_eq!(claims.user_id().unwrap(), user);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_token(UserId::new(), Role::SystemAdmin, None, SECRET, 60).unwrap();
        assert!(matches!(validate_token(&token, "other"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_role_checks() {
        let admin = Claims {
            sub: UserId::new().as_uuid().to_string(),
            role: Role::SystemAdmin,
            agency_id: None,
            exp: 0,
            iat: 0,
        };
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_agency().is_err());

        let agency_admin = Claims {
            role: Role::AgencyAdmin,
            agency_id: Some(AgencyId::new()),
            ..admin
        };
        assert!(agency_admin.require_admin().is_err());
        assert!(agency_admin.require_any_admin().is_ok());
        assert!(agency_admin.require_agency().is_ok());
    }
}
