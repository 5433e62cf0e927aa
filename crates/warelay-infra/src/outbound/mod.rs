//! Outbound messaging through the WhatsApp Cloud API.

mod cache;
mod client;

pub use cache::ClientCache;
pub use client::WhatsAppClient;
