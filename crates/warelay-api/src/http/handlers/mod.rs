pub mod send;
pub mod webhook;
