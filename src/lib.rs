//! Agent Flows - LLM agent orchestration
//!
//! Typed, named flows over a generation port: intent classification,
//! schema-validated planning, persona-driven specialists, and a conductor
//! that chains planning into drafting.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
