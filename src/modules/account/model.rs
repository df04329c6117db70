//! Account data models and DTOs.
//!
//! Re-exports the user models from the `scoreboard-models` crate.

pub use scoreboard_models::users::*;
