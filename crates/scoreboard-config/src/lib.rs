//! # Scoreboard Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`email`]: SMTP settings and the public base URL for mail links
//! - [`cors`]: allowed origins
//! - [`database`]: persistence backend selection
//! - [`server`]: bind address and observability toggle
//!
//! Each config is built once at startup and injected into the components
//! that need it; nothing reads the environment after that.
//!
//! # Example
//!
//! ```ignore
//! use scoreboard_config::{JwtConfig, EmailConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let email_config = EmailConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
