//! Credential verification and token issuance.

pub mod client;
pub mod jwt;
pub mod password;
pub mod refresh;
