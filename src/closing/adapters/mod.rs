//! Adapter implementations of the closing ports.

pub mod memory;
