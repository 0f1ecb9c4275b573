//! The boundary to the legacy relational source.
//!
//! The conversion pipeline never talks to a database directly; it consumes a
//! [`FormRepository`], which hands over fully materialized per-form rows. The
//! bundled implementation, [`JsonSource`], reads a JSON dump of the legacy
//! tables.

/// JSON dump implementation of the repository.
pub mod json;
pub use json::{JsonSource, LoadError};

use serde::Deserialize;

use crate::domain::{Component, ConditionalRule, EmailRule, RoleGrant};

/// Read access to the legacy form tables, one form at a time.
///
/// Implementations must return components ordered by `(pid, weight)`; the
/// tree builder relies on that read order for sibling ordering.
pub trait FormRepository {
    /// Ids of every form in the source.
    fn form_ids(&self) -> Vec<u64>;

    /// The full row set for one form, or `None` if the id is unknown.
    fn form(&self, nid: u64) -> Option<&FormRecord>;

    /// Whether the source schema carries conditional-action tables.
    ///
    /// Legacy schemas from before conditional-action support cannot be
    /// converted faithfully and are skipped wholesale.
    fn has_conditional_actions(&self) -> bool;
}

/// All source rows belonging to one form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormRecord {
    /// Form id.
    pub nid: u64,

    /// Form title.
    #[serde(default)]
    pub title: String,

    /// Whether the form is open for submissions.
    #[serde(default = "default_true")]
    pub status: bool,

    /// Redirect target, or one of the `<confirmation>`/`<none>` sentinels.
    #[serde(default)]
    pub redirect_url: String,

    /// Per-user submission limit; negative means unlimited.
    #[serde(default = "default_limit")]
    pub submit_limit: i64,

    /// Form-wide submission limit; negative means unlimited.
    #[serde(default = "default_limit")]
    pub total_submit_limit: i64,

    /// Component rows, ordered by `(pid, weight)`.
    #[serde(default)]
    pub components: Vec<Component>,

    /// Joined conditional rule rows.
    #[serde(default)]
    pub conditionals: Vec<ConditionalRule>,

    /// Notification rule rows.
    #[serde(default)]
    pub emails: Vec<EmailRule>,

    /// Role grant rows.
    #[serde(default)]
    pub roles: Vec<RoleGrant>,
}

impl FormRecord {
    /// The conditional rule rows addressed to one target component, in
    /// source order.
    #[must_use]
    pub fn conditionals_for(&self, target: u64) -> Vec<&ConditionalRule> {
        self.conditionals
            .iter()
            .filter(|rule| rule.target == target)
            .collect()
    }
}

const fn default_true() -> bool {
    true
}

const fn default_limit() -> i64 {
    -1
}
