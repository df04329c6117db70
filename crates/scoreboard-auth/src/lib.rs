//! # Scoreboard Auth
//!
//! Token types and JWT utilities for the Scoreboard API.
//!
//! - [`claims`]: [`AuthenticatedUser`], [`Role`], and the [`Claims`] payload
//! - [`jwt`]: [`issue_token`] and [`decode_token`]
//!
//! # Example
//!
//! ```ignore
//! use scoreboard_auth::{decode_token, issue_token};
//! use scoreboard_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = issue_token(&user, &config)?;
//! let same_user = decode_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::{AuthenticatedUser, Claims, Role, UserName};
pub use jwt::{decode_token, issue_token, issue_token_with_ttl};
