//! Shared utilities.
//!
//! - [`email`]: the [`Mailer`](email::Mailer) abstraction and its SMTP and logging implementations

pub mod email;
