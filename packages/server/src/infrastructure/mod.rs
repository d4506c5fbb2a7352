//! Infrastructure layer: adapters for the domain ports and wire DTOs.

pub mod dto;
pub mod log;
pub mod registry;
pub mod repository;
