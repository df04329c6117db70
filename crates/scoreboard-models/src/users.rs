//! User entity and account DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scoreboard_auth::{AuthenticatedUser, Role, UserName};
use scoreboard_db::Document;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: UserName,
    pub role: Role,
    /// bcrypt digest of the password.
    pub hash: String,
    pub blocked: bool,
    pub verified: bool,
    /// Link mailed to the user; its last segment is the verification secret.
    pub verification_url: String,
    /// Most recently issued token.
    pub token: String,
}

impl User {
    /// The identity embedded in this user's tokens.
    pub fn to_claims(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            verified: self.verified,
        }
    }

    /// Secret suffix of the verification link.
    pub fn verification_suffix(&self) -> &str {
        self.verification_url
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Name as submitted at registration; every part may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterName {
    pub first: Option<String>,
    pub middle: Option<String>,
    pub last: Option<String>,
}

/// Registration body. Fields are optional so that the service, not the
/// decoder, reports which rule a request breaks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<RegisterName>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub bytes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedResponse {
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendResponse {
    pub sent: bool,
}
