//! Authentication and authorization stages of the request pipeline.
//!
//! - [`auth`]: optional bearer-token decoding and the authorization gate
//! - [`role`]: [`UserCheck`](role::UserCheck) strategies applied by the gate
//!
//! # Authorization Flow
//!
//! 1. The token stage decodes `Authorization: Bearer <token>` if present
//! 2. For endpoints requiring authentication, the gate rejects anonymous callers
//! 3. It then rejects callers whose email is not verified
//! 4. Finally the endpoint's `UserCheck` decides eligibility
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::authorize;
//! use crate::middleware::role::RequireRole;
//!
//! authorize(true, ctx.user(), &RequireRole(Role::Jury)).await?;
//! ```

pub mod auth;
pub mod role;
