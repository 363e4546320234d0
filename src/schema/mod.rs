//! Schema module - embedded response schemas and validation

pub mod registry;

pub use registry::{ResponseSchema, SchemaError, SchemaRegistry, StageSchema};
