//! Durable message log implementations.

pub mod csv;

pub use csv::CsvMessageLog;
