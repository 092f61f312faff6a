//! Request-independent UI state: list pagination and delete confirmation.

pub mod confirm;
pub mod list;
