//! Transcoders from a parameter table to other data formats.

pub mod cbor;
pub mod json;
pub mod toml;
pub mod yaml;
