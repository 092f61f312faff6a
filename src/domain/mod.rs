//! Domain records and value objects handled by the admin panel.

mod de;
pub mod lead;
pub mod session;
pub mod types;
pub mod user;
