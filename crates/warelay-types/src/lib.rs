//! Shared domain types for the warelay webhook relay.
//!
//! This crate contains the types used across the relay: tenant records and
//! engine descriptors, inbound webhook payload shapes, the outbound send
//! request, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
mod de;
pub mod error;
pub mod send;
pub mod tenant;
pub mod webhook;
