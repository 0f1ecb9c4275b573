//! Domain models for the legacy form schema and the converted records.
//!
//! The source side (components, conditional rules, email rules, role grants)
//! mirrors the flat relational tables of the legacy form module. The output
//! side (email handlers, access table, form settings) matches the records the
//! converted form document travels with.

/// Form component rows and their per-type configuration.
pub mod component;
pub use component::{Component, ComponentExtra, ComponentType, FileFiltering};

/// Conditional-visibility rule rows.
pub mod conditional;
pub use conditional::{ConditionalRule, RuleAction, RuleOperator};

mod email;
pub use email::{EmailHandler, EmailRule};

mod access;
pub use access::{AccessEntry, AccessTable, RoleGrant};

mod settings;
pub use settings::{ConfirmationType, FormSettings, FormStatus};
