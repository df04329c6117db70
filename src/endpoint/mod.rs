//! Declarative endpoints and the pipeline they compile into.
//!
//! An [`Endpoint`] describes one route: its method and path, the fields a
//! request must carry, whether a caller must be authenticated, which callers
//! are eligible, a precondition over the request, and the action to run.
//! The [`EndpointRegistry`] turns a list of endpoints into an axum router
//! where every route runs the same fixed chain of stages (see [`chain`]).
//!
//! # Example
//!
//! ```ignore
//! use crate::endpoint::{Endpoint, EndpointRegistry};
//! use crate::middleware::role::RequireRole;
//!
//! let registry = EndpointRegistry::new([
//!     Endpoint::post("/competition", CreateCompetition)
//!         .require(&["name", "description", "location", "rounds"])
//!         .authenticated(RequireRole(Role::Jury)),
//! ])?;
//! let router = registry.router();
//! ```

pub mod chain;
pub mod context;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::routing::MethodFilter;
use serde::Serialize;
use serde_json::Value;

use scoreboard_core::AppError;

use crate::middleware::role::{AnyUser, UserCheck};
use crate::state::AppState;

pub use chain::Stage;
pub use context::RequestContext;
pub use registry::{EndpointRegistry, RegistryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }

    pub fn filter(&self) -> MethodFilter {
        match self {
            RequestMethod::Get => MethodFilter::GET,
            RequestMethod::Post => MethodFilter::POST,
            RequestMethod::Put => MethodFilter::PUT,
            RequestMethod::Delete => MethodFilter::DELETE,
        }
    }

    /// `GET` parameters come from the query string, the rest from the body.
    pub fn reads_query(&self) -> bool {
        matches!(self, RequestMethod::Get)
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predicate over the request, run after authorization.
///
/// Returning `Ok(false)` rejects the request with `AccessDenied`; returning an
/// error forwards that error unchanged.
#[async_trait]
pub trait Precondition: Send + Sync {
    async fn check(&self, state: &AppState, ctx: &RequestContext) -> Result<bool, AppError>;
}

/// Precondition that always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

#[async_trait]
impl Precondition for Always {
    async fn check(&self, _state: &AppState, _ctx: &RequestContext) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// The domain operation behind an endpoint. Its value is the response body.
#[async_trait]
pub trait Action: Send + Sync {
    async fn call(&self, state: &AppState, ctx: &RequestContext) -> Result<Value, AppError>;
}

/// Serializes an action result.
pub fn to_json<T: Serialize>(value: T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(AppError::internal)
}

/// One route and its pipeline configuration. Immutable once registered.
#[derive(Clone)]
pub struct Endpoint {
    method: RequestMethod,
    path: String,
    auth_required: bool,
    required_fields: Vec<&'static str>,
    user_check: Arc<dyn UserCheck>,
    precondition: Arc<dyn Precondition>,
    action: Arc<dyn Action>,
    summary: Option<&'static str>,
    tag: Option<&'static str>,
}

impl Endpoint {
    /// An open endpoint with no required fields and no precondition.
    pub fn new(
        method: RequestMethod,
        path: impl Into<String>,
        action: impl Action + 'static,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            auth_required: false,
            required_fields: Vec::new(),
            user_check: Arc::new(AnyUser),
            precondition: Arc::new(Always),
            action: Arc::new(action),
            summary: None,
            tag: None,
        }
    }

    pub fn get(path: impl Into<String>, action: impl Action + 'static) -> Self {
        Self::new(RequestMethod::Get, path, action)
    }

    pub fn post(path: impl Into<String>, action: impl Action + 'static) -> Self {
        Self::new(RequestMethod::Post, path, action)
    }

    pub fn put(path: impl Into<String>, action: impl Action + 'static) -> Self {
        Self::new(RequestMethod::Put, path, action)
    }

    pub fn delete(path: impl Into<String>, action: impl Action + 'static) -> Self {
        Self::new(RequestMethod::Delete, path, action)
    }

    /// Requires a verified caller accepted by `check`.
    pub fn authenticated(mut self, check: impl UserCheck + 'static) -> Self {
        self.auth_required = true;
        self.user_check = Arc::new(check);
        self
    }

    pub fn require(mut self, fields: &[&'static str]) -> Self {
        self.required_fields.extend_from_slice(fields);
        self
    }

    pub fn precondition(mut self, precondition: impl Precondition + 'static) -> Self {
        self.precondition = Arc::new(precondition);
        self
    }

    pub fn summary(mut self, summary: &'static str) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn auth_required(&self) -> bool {
        self.auth_required
    }

    pub fn required_fields(&self) -> &[&'static str] {
        &self.required_fields
    }

    pub fn user_check(&self) -> &dyn UserCheck {
        self.user_check.as_ref()
    }

    pub fn precondition_check(&self) -> &dyn Precondition {
        self.precondition.as_ref()
    }

    pub fn action(&self) -> &dyn Action {
        self.action.as_ref()
    }

    pub fn summary_text(&self) -> Option<&'static str> {
        self.summary
    }

    pub fn tag_name(&self) -> Option<&'static str> {
        self.tag
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("auth_required", &self.auth_required)
            .field("required_fields", &self.required_fields)
            .finish_non_exhaustive()
    }
}
