//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth` for the identity cache, `storage` for
//! the stored-URL slot and navigation seam) so individual consumers can
//! depend on small focused models.

pub mod auth;
pub mod storage;
