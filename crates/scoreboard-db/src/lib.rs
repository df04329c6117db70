//! # Scoreboard DB
//!
//! Document persistence for the Scoreboard API.
//!
//! - [`store`]: the [`DocumentStore`] trait (find by id, find one, find, save,
//!   insert unique, delete)
//! - [`repository`]: [`Repository`], typed access to one collection of [`Document`]s
//! - [`filter`]: equality [`Filter`]s and field [`Projection`]s
//! - [`memory`]: in-process [`MemoryStore`]
//! - [`postgres`]: [`PgStore`] over a JSONB table, with embedded migrations
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use scoreboard_db::{Filter, MemoryStore, Repository};
//!
//! let users: Repository<User> = Repository::new(Arc::new(MemoryStore::new()));
//! let user = users.find_one(&Filter::all().field("email", "a@b.com")).await?;
//! ```

pub mod error;
pub mod filter;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod store;

pub use error::StoreError;
pub use filter::{Filter, Projection};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{Document, Repository};
pub use store::DocumentStore;
