//! # Middleware Modules
//!
//! Request rewriting applied in front of the router.

pub mod method_override;
