//! CLI command implementations

pub mod combine;
