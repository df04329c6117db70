use async_trait::async_trait;
use serde_json::Value;

use scoreboard_core::AppError;

use crate::endpoint::{Action, RequestContext, to_json};
use crate::state::AppState;

use super::model::{LoginRequest, RegisterRequest, ResendVerificationRequest, VerifyEmailRequest};
use super::service::AccountService;

pub struct Register;

#[async_trait]
impl Action for Register {
    async fn call(&self, state: &AppState, ctx: &RequestContext) -> Result<Value, AppError> {
        let dto: RegisterRequest = ctx.params().parse()?;
        to_json(AccountService::register(state, dto).await?)
    }
}

pub struct Login;

#[async_trait]
impl Action for Login {
    async fn call(&self, state: &AppState, ctx: &RequestContext) -> Result<Value, AppError> {
        let dto: LoginRequest = ctx.params().parse()?;
        to_json(AccountService::login(state, dto).await?)
    }
}

pub struct ResendVerification;

#[async_trait]
impl Action for ResendVerification {
    async fn call(&self, state: &AppState, ctx: &RequestContext) -> Result<Value, AppError> {
        let dto: ResendVerificationRequest = ctx.params().parse()?;
        to_json(AccountService::resend_verification(state, dto).await?)
    }
}

pub struct VerifyEmail;

#[async_trait]
impl Action for VerifyEmail {
    async fn call(&self, state: &AppState, ctx: &RequestContext) -> Result<Value, AppError> {
        let dto: VerifyEmailRequest = ctx.params().parse()?;
        to_json(AccountService::verify_email(state, dto).await?)
    }
}

/// Echoes the caller's token claims.
pub struct Profile;

#[async_trait]
impl Action for Profile {
    async fn call(&self, _state: &AppState, ctx: &RequestContext) -> Result<Value, AppError> {
        to_json(ctx.require_user()?)
    }
}
