use scoreboard_auth::AuthenticatedUser;
use scoreboard_core::AppError;

use crate::validator::RequestParams;

/// Per-request state handed to every stage after token decoding.
///
/// The caller is fixed at construction; stages only get shared access.
#[derive(Debug, Clone)]
pub struct RequestContext {
    params: RequestParams,
    user: Option<AuthenticatedUser>,
}

impl RequestContext {
    pub fn new(params: RequestParams, user: Option<AuthenticatedUser>) -> Self {
        Self { params, user }
    }

    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    /// The caller, for actions that only run behind the authorization gate.
    pub fn require_user(&self) -> Result<&AuthenticatedUser, AppError> {
        self.user().ok_or_else(AppError::authentication_required)
    }
}
