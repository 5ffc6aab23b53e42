//! Core types and service wiring for decoding Indonesian vehicle registration plates (TNKB).

/// Domain models describing regions and decoded vehicles.
pub mod model;
/// Plate normalization and parsing.
pub mod plate;
/// Traits describing the remote lookup interface and the shared error types.
pub mod ports;
/// Compiled-in table of regional plate prefixes.
pub mod registry;
/// High-level service facade used by clients.
pub mod service;

pub use model::*;
pub use plate::*;
pub use ports::*;
pub use registry::*;
pub use service::*;
