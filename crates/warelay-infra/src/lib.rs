//! Infrastructure adapters for the warelay webhook relay.
//!
//! - [`engine`]: the closed set of reply engines and their factory
//! - [`outbound`]: the WhatsApp Cloud API client and per-credential cache
//! - [`config`]: environment-driven settings loading
//! - [`seed`]: dev seed-file loading

pub mod config;
pub mod engine;
pub mod outbound;
pub mod seed;
