// src/core/mod.rs — Fallback orchestration and session memory

pub mod canned;
pub mod orchestrator;
pub mod session;
