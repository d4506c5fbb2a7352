//! Utilities shared by the NightOwl server and client.

pub mod logger;
pub mod time;
