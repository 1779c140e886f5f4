//! Bearer JWT authentication and claims-based authorization for
//! resource-oriented HTTP APIs.
//!
//! The decision engine (`services::auth`) is pure and synchronous; the axum glue
//! in `middleware::auth` maps its result onto request extensions or a 401.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
