//! Shared token primitives for the feed backend.
//!
//! `jwt` issues and verifies the signed identity tokens that gate every
//! authenticated request.

pub mod jwt;

pub use jwt::{Claims, TokenError, TokenService};
