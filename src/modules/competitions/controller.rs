use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use scoreboard_core::AppError;

use crate::endpoint::{Action, Precondition, RequestContext, to_json};
use crate::state::AppState;

use super::model::{CompetitionIdRequest, CreateCompetitionRequest, UpdateCompetitionRequest};
use super::service::CompetitionService;

fn competition_id(ctx: &RequestContext) -> Result<String, AppError> {
    let CompetitionIdRequest { id } = ctx.params().parse()?;
    Ok(id)
}

pub struct ListCompetitions;

#[async_trait]
impl Action for ListCompetitions {
    async fn call(&self, state: &AppState, _ctx: &RequestContext) -> Result<Value, AppError> {
        to_json(CompetitionService::list(state).await?)
    }
}

pub struct CreateCompetition;

#[async_trait]
impl Action for CreateCompetition {
    async fn call(&self, state: &AppState, ctx: &RequestContext) -> Result<Value, AppError> {
        let dto: CreateCompetitionRequest = ctx.params().parse()?;
        let creator = ctx.require_user()?;
        to_json(CompetitionService::create(state, dto, creator).await?)
    }
}

pub struct GetCompetition;

#[async_trait]
impl Action for GetCompetition {
    async fn call(&self, state: &AppState, ctx: &RequestContext) -> Result<Value, AppError> {
        let id = competition_id(ctx)?;
        to_json(CompetitionService::get(state, &id).await?)
    }
}

pub struct GetCompetitionDetailed;

#[async_trait]
impl Action for GetCompetitionDetailed {
    async fn call(&self, state: &AppState, ctx: &RequestContext) -> Result<Value, AppError> {
        let id = competition_id(ctx)?;
        to_json(CompetitionService::get_detailed(state, &id).await?)
    }
}

pub struct UpdateCompetition;

#[async_trait]
impl Action for UpdateCompetition {
    async fn call(&self, state: &AppState, ctx: &RequestContext) -> Result<Value, AppError> {
        let id = competition_id(ctx)?;
        let dto: UpdateCompetitionRequest = ctx.params().parse()?;
        to_json(CompetitionService::update(state, &id, dto).await?)
    }
}

pub struct RemoveCompetition;

#[async_trait]
impl Action for RemoveCompetition {
    async fn call(&self, state: &AppState, ctx: &RequestContext) -> Result<Value, AppError> {
        let id = competition_id(ctx)?;
        to_json(CompetitionService::remove(state, &id).await?)
    }
}

/// The caller is one of the competition's juries.
pub struct IsJury;

#[async_trait]
impl Precondition for IsJury {
    async fn check(&self, state: &AppState, ctx: &RequestContext) -> Result<bool, AppError> {
        let Some(user) = ctx.user() else {
            return Ok(false);
        };
        let competition = CompetitionService::find(state, &competition_id(ctx)?).await?;
        Ok(competition.is_jury(&user.email))
    }
}

/// The caller created the competition.
pub struct IsCreator;

#[async_trait]
impl Precondition for IsCreator {
    async fn check(&self, state: &AppState, ctx: &RequestContext) -> Result<bool, AppError> {
        let Some(user) = ctx.user() else {
            return Ok(false);
        };
        let competition = CompetitionService::find(state, &competition_id(ctx)?).await?;
        Ok(competition.is_creator(&user.email))
    }
}

/// The caller created the competition and its first round has not started.
pub struct IsCreatorBeforeStart;

#[async_trait]
impl Precondition for IsCreatorBeforeStart {
    async fn check(&self, state: &AppState, ctx: &RequestContext) -> Result<bool, AppError> {
        let Some(user) = ctx.user() else {
            return Ok(false);
        };
        let competition = CompetitionService::find(state, &competition_id(ctx)?).await?;
        let not_started = competition
            .starts_at()
            .is_none_or(|start| start > Utc::now());
        Ok(competition.is_creator(&user.email) && not_started)
    }
}
