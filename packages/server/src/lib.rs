//! NightOwl chat relay.
//!
//! Clients connect over WebSocket, every accepted message is broadcast to
//! all connected clients, kept in a bounded in-memory history that is
//! replayed to new joiners, and appended to a CSV message log.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
