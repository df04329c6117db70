//! Competition data models and DTOs.
//!
//! Re-exports the competition models from the `scoreboard-models` crate.

pub use scoreboard_models::competitions::*;
