//! # Scoreboard Core
//!
//! Foundational types shared by every Scoreboard crate:
//!
//! - [`errors`]: the [`AppError`] failure type and its JSON response shape
//! - [`password`]: bcrypt credential hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use scoreboard_core::{AppError, hash_password, verify_password};
//!
//! let digest = hash_password("correct horse")?;
//! if !verify_password("correct horse", &digest)? {
//!     return Err(AppError::domain("Incorrect email or password"));
//! }
//! ```

pub mod errors;
pub mod password;

pub use errors::{AppError, ErrorBody, ErrorKind};
pub use password::{hash_password, verify_password};
