use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use scoreboard_auth::{Role, UserName, issue_token};
use scoreboard_core::{AppError, hash_password, verify_password};
use scoreboard_db::{Filter, StoreError};

use crate::metrics;
use crate::state::AppState;
use crate::utils::email::{VERIFICATION_SUBJECT, verification_template};

use super::model::{
    LoginRequest, LoginResponse, RegisterRequest, ResendResponse, ResendVerificationRequest,
    TokenResponse, User, VerifiedResponse, VerifyEmailRequest,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

fn already_exists(email: &str) -> AppError {
    AppError::conflict(format!(
        "Cannot register user {}, user already exists",
        email
    ))
}

fn incorrect_credentials() -> AppError {
    AppError::domain("Incorrect email or password")
}

pub struct AccountService;

impl AccountService {
    #[instrument(skip(state, dto), fields(user.email = ?dto.email, db.collection = "users"))]
    pub async fn register(
        state: &AppState,
        dto: RegisterRequest,
    ) -> Result<TokenResponse, AppError> {
        let display_email = dto.email.clone().unwrap_or_default();

        let role = match dto.role.as_deref().map(str::parse::<Role>) {
            Some(Ok(role)) => role,
            _ => {
                return Err(AppError::domain(format!(
                    "Cannot register user {} with role {}",
                    display_email,
                    dto.role.as_deref().unwrap_or("null")
                )));
            }
        };

        let malformed = || {
            AppError::domain(format!(
                "Cannot register user {}, malformed request",
                display_email
            ))
        };
        let (Some(email), Some(password), Some(name)) = (dto.email, dto.password, dto.name) else {
            return Err(malformed());
        };
        let Some(first) = name.first else {
            return Err(malformed());
        };

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::domain(format!(
                "Cannot register user {}, password is too short",
                email
            )));
        }

        if !email.validate_email() {
            return Err(AppError::domain(format!(
                "Cannot register user {}, malformed email",
                email
            )));
        }

        let users = state.users();
        let existing = users
            .find_one(&Filter::all().field("email", email.as_str()))
            .await
            .map_err(AppError::internal)?;
        if existing.is_some() {
            warn!(user.email = %email, "Attempted to register an existing email");
            return Err(already_exists(&email));
        }

        let hash = hash_password(&password)?;
        let secret = hex::encode(rand::random::<[u8; 32]>());
        let verification_url = format!(
            "{}/account/verify/{}/{}",
            state.email_config.base_url.trim_end_matches('/'),
            email,
            secret
        );

        let mut user = User {
            id: Uuid::new_v4(),
            email,
            name: UserName {
                first,
                middle: name.middle,
                last: name.last,
            },
            role,
            hash,
            blocked: false,
            verified: false,
            verification_url,
            token: String::new(),
        };

        let token = issue_token(&user.to_claims(), &state.jwt_config)?;
        metrics::track_jwt_issued();
        user.token = token.clone();

        // A concurrent registration can pass the lookup above; the store
        // decides which one gets the email.
        let email = user.email.clone();
        let user = users
            .insert_unique(user, "email")
            .await
            .map_err(|err| match err {
                StoreError::Duplicate { .. } => {
                    warn!(user.email = %email, "Lost a concurrent registration race");
                    already_exists(&email)
                }
                other => AppError::internal(other),
            })?;
        metrics::track_user_registered(user.role.as_str());
        info!(user.id = %user.id, user.role = %user.role, "User registered");

        // The account stays; logging in and resending recovers from a lost mail.
        Self::deliver_verification(state, &user).await?;

        Ok(TokenResponse { token })
    }

    #[instrument(skip(state, dto), fields(user.email = %dto.email, db.collection = "users"))]
    pub async fn login(state: &AppState, dto: LoginRequest) -> Result<LoginResponse, AppError> {
        let users = state.users();
        let Some(mut user) = users
            .find_one(&Filter::all().field("email", dto.email.as_str()))
            .await
            .map_err(AppError::internal)?
        else {
            metrics::track_user_login_failure();
            return Err(incorrect_credentials());
        };

        if !verify_password(&dto.password, &user.hash)? {
            metrics::track_user_login_failure();
            return Err(incorrect_credentials());
        }

        let token = issue_token(&user.to_claims(), &state.jwt_config)?;
        metrics::track_jwt_issued();
        user.token = token.clone();

        let user = users.save(user).await.map_err(AppError::internal)?;
        metrics::track_user_login_success(user.role.as_str());
        debug!(user.id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            verified: user.verified,
        })
    }

    #[instrument(skip(state, dto), fields(user.email = %dto.email))]
    pub async fn resend_verification(
        state: &AppState,
        dto: ResendVerificationRequest,
    ) -> Result<ResendResponse, AppError> {
        let user = state
            .users()
            .find_one(&Filter::all().field("email", dto.email.as_str()))
            .await
            .map_err(AppError::internal)?
            .ok_or_else(incorrect_credentials)?;

        if user.token != dto.token {
            return Err(incorrect_credentials());
        }

        if user.verified {
            return Err(AppError::domain("This E-Mail address is already verified"));
        }

        Self::deliver_verification(state, &user).await?;

        Ok(ResendResponse { sent: true })
    }

    #[instrument(skip(state, dto), fields(user.email = %dto.email))]
    pub async fn verify_email(
        state: &AppState,
        dto: VerifyEmailRequest,
    ) -> Result<VerifiedResponse, AppError> {
        let users = state.users();
        let mut user = users
            .find_one(&Filter::all().field("email", dto.email.as_str()))
            .await
            .map_err(AppError::internal)?
            .ok_or_else(incorrect_credentials)?;

        if user.verification_suffix() != dto.bytes {
            warn!(user.email = %user.email, "Verification attempted with wrong bytes");
            return Err(AppError::domain("Incorrect bytes"));
        }

        user.verified = true;
        users.save(user).await.map_err(AppError::internal)?;
        metrics::track_email_verified();

        Ok(VerifiedResponse { verified: true })
    }

    async fn deliver_verification(state: &AppState, user: &User) -> Result<(), AppError> {
        let html = verification_template(&user.name.first, &user.verification_url);
        state
            .mailer
            .send(&user.email, VERIFICATION_SUBJECT, &html)
            .await
    }
}
