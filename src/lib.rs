//! # secboard
//!
//! Authentication and account-state core for the security dashboard client.
//!
//! This crate owns the answer to "who is the current user": it fetches the
//! account from the backend, caches it, and broadcasts authentication-state
//! changes to every interested consumer (route guards, menu rendering, and
//! other UI components). It deliberately contains no rendering, routing, or
//! form logic — those layers consume [`state::auth::IdentityCache`] and the
//! network types defined here.

pub mod config;
pub mod nature;
pub mod net;
pub mod state;
