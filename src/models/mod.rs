//! Server-side models that are not part of the backend's data.

pub mod auth;
pub mod config;
