//! Contains storage layer implementations for triplestream.

pub mod memory;
