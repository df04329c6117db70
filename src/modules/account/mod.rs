//! Registration, login and email verification.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
