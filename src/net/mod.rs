//! Network layer: wire types and the account API client.
//!
//! DESIGN
//! ======
//! All HTTP traffic to the backend goes through the [`account::AccountApi`]
//! trait so state modules can be tested against mocks. The only concrete
//! implementation is [`account::HttpAccountApi`] (reqwest).

pub mod account;
pub mod types;
