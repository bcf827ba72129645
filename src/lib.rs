// src/lib.rs — Library root for chat-relay

pub mod api;
pub mod core;
pub mod infra;
pub mod provider;
