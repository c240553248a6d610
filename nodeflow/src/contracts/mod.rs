//! Input/output contracts for components.
//!
//! This module provides:
//! - The `Schema` capability and stock implementations
//! - The validation wrapper applied at node insertion

mod schema;
mod wrapper;

pub use schema::{FieldViolation, FnSchema, ModelSchema, RequiredFields, Schema, Validate};
pub use wrapper::{SchemaPair, ValidatedComponent};
