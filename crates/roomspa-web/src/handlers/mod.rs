//! Handlers outside the admin page tree: sign-in, live sockets and assets

pub mod assets;
pub mod auth;
pub mod live;
