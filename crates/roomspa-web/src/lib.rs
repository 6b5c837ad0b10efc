//! `RoomSpa` admin dashboard
//!
//! Server-rendered pages over the `RoomSpa` admin REST API: people, bookings,
//! conversations, coupons, analytics, reports and operations, behind a
//! cookie session.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod forms;
pub mod handlers;
pub mod list;
pub mod navigation;
pub mod pages;
pub mod poll;
pub mod render;
pub mod routes;
pub mod server;
pub mod session;
pub mod shell;
pub mod state;

// Re-export the main functions
pub use server::build_app;
pub use state::{AppState, SharedState};
