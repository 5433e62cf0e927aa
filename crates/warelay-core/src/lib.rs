//! Core routing and dispatch logic for the warelay webhook relay.
//!
//! - [`directory`]: the multi-key tenant index with cache-aside loader fallback
//! - [`signature`]: constant-time X-Hub-Signature-256 verification
//! - [`routing`]: routing-id extraction from nested webhook payloads
//! - [`outbound`]: traits decoupling the pipeline from the concrete sender
//! - [`dispatch`]: the bounded background worker pool
//!
//! Infrastructure implementations (HTTP clients, engines) live in
//! `warelay-infra`; this crate only depends on traits and pure logic.

pub mod directory;
pub mod dispatch;
pub mod outbound;
pub mod routing;
pub mod signature;
