//! Adapter implementations for task, integration, and event ports.

pub mod memory;
pub mod postgres;
