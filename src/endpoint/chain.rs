//! The fixed per-request stage sequence.
//!
//! ```text
//! token decode -> body validation -> authorization -> precondition -> action
//! ```
//!
//! Stages run strictly in order and the first failure ends the request at
//! [`respond_failure`], the single place where pipeline errors are logged and
//! turned into responses.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    body::to_bytes,
    extract::{FromRequestParts, Path, Request},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, error, warn};

use scoreboard_core::{AppError, ErrorKind};

use crate::endpoint::{Endpoint, RequestContext};
use crate::metrics::track_pipeline_failure;
use crate::middleware::auth::{authorize, decode_credential};
use crate::state::AppState;
use crate::validator::{RequestParams, validate_required};

/// Largest request body the pipeline will read.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Stages that can end a request. Token decoding is not one of them: an
/// undecodable token leaves the caller anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    BodyValidation,
    Authorization,
    Precondition,
    Action,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::BodyValidation => "body_validation",
            Stage::Authorization => "authorization",
            Stage::Precondition => "precondition",
            Stage::Action => "action",
        }
    }
}

/// Runs `endpoint`'s chain for one request.
pub async fn handle(endpoint: Arc<Endpoint>, state: AppState, request: Request) -> Response {
    match run(&endpoint, &state, request).await {
        Ok(value) => {
            debug!(
                method = %endpoint.method(),
                path = endpoint.path(),
                "Request completed by action"
            );
            Json(value).into_response()
        }
        Err((stage, err)) => respond_failure(&endpoint, stage, err),
    }
}

async fn run(
    endpoint: &Endpoint,
    state: &AppState,
    request: Request,
) -> Result<Value, (Stage, AppError)> {
    let user = decode_credential(request.headers(), &state.jwt_config);

    let params = collect_params(endpoint, state, request)
        .await
        .map_err(at(Stage::BodyValidation))?;
    validate_required(&params, endpoint.required_fields()).map_err(at(Stage::BodyValidation))?;

    let ctx = RequestContext::new(params, user);

    authorize(endpoint.auth_required(), ctx.user(), endpoint.user_check())
        .await
        .map_err(at(Stage::Authorization))?;

    let allowed = endpoint
        .precondition_check()
        .check(state, &ctx)
        .await
        .map_err(at(Stage::Precondition))?;
    if !allowed {
        return Err((Stage::Precondition, AppError::access_denied()));
    }

    endpoint
        .action()
        .call(state, &ctx)
        .await
        .map_err(at(Stage::Action))
}

fn at(stage: Stage) -> impl FnOnce(AppError) -> (Stage, AppError) {
    move |err| (stage, err)
}

/// Builds the parameter set: query or body, then path captures on top.
async fn collect_params(
    endpoint: &Endpoint,
    state: &AppState,
    request: Request,
) -> Result<RequestParams, AppError> {
    let (mut parts, body) = request.into_parts();

    let mut params = if endpoint.method().reads_query() {
        RequestParams::from_query(&parts.uri)?
    } else {
        let bytes = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|_| AppError::malformed_request())?;
        RequestParams::from_body(&bytes)?
    };

    // Routes without captures reject here; that just means no path params.
    if let Ok(Path(captures)) =
        Path::<HashMap<String, String>>::from_request_parts(&mut parts, state).await
    {
        params.merge_path(captures);
    }

    Ok(params)
}

/// Logs a failed request, counts it, and renders the error body.
pub fn respond_failure(endpoint: &Endpoint, stage: Stage, err: AppError) -> Response {
    if err.kind == ErrorKind::Internal {
        error!(
            method = %endpoint.method(),
            path = endpoint.path(),
            stage = stage.as_str(),
            kind = %err.kind,
            status = err.status.as_u16(),
            error = ?err.error,
            "Request failed"
        );
    } else {
        warn!(
            method = %endpoint.method(),
            path = endpoint.path(),
            stage = stage.as_str(),
            kind = %err.kind,
            status = err.status.as_u16(),
            error = %err.error,
            "Request rejected"
        );
    }

    track_pipeline_failure(err.kind.as_str(), stage.as_str());

    err.into_response()
}
