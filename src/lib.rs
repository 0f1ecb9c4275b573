//! Legacy webform conversion
//!
//! Converts flat relational webform definitions (components keyed by
//! id/parent-id/weight, plus conditional, email and role rule tables) into
//! hierarchical declarative form documents.

pub mod domain;
pub use domain::{AccessTable, Component, ComponentType, EmailHandler, FormSettings};

/// The boundary to the legacy relational source.
pub mod source;
pub use source::{FormRecord, FormRepository, JsonSource, LoadError};

/// The conversion pipeline.
pub mod transform;
pub use transform::{FormOutput, TransformError, convert_form};
