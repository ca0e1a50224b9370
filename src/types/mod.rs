//! This module defines the core, strongly-typed data representations used
//! throughout the page value engine.
//!
//! It includes the `PhysicalType` and `Encoding` enums that replace the format's
//! raw numeric tags, the `TypedValue` variant produced by every decoder, and the
//! request structs that carry per-column metadata into the dispatcher.

pub mod encoding;
pub mod physical_type;
pub mod request;
pub mod typed_value;

// Re-export the main type(s) for easier access.
pub use encoding::Encoding;
pub use physical_type::PhysicalType;
pub use request::{DecodeRequest, EncodeRequest};
pub use typed_value::TypedValue;
