//! Gadget Concierge - LINE chat assistant for 3C products
//!
//! This crate implements a conversational shopping assistant: webhook
//! messages are routed through a per-user conversation state machine to
//! intent handlers that query a web-search-enabled completion API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
