use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One notification rule row from the legacy email table.
///
/// The recipient, subject and sender fields may hold either literal text or a
/// component id (stored as a bare number) meaning "use that component's
/// submitted value".
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmailRule {
    /// Email rule id, unique within one form.
    pub eid: u64,

    /// Recipient address or component id.
    #[serde(default)]
    pub email: String,

    /// Subject line or component id.
    #[serde(default)]
    pub subject: String,

    /// Sender display name or component id.
    #[serde(default)]
    pub from_name: String,

    /// Sender address or component id.
    #[serde(default)]
    pub from_address: String,

    /// Message body template.
    #[serde(default)]
    pub template: String,

    /// Comma-separated component ids excluded from the submission digest.
    #[serde(default)]
    pub excluded_components: String,

    /// Send as HTML.
    #[serde(default)]
    pub html: bool,

    /// Attach uploaded files.
    #[serde(default)]
    pub attachments: bool,
}

/// A converted email handler record.
///
/// Component-id references from the source rule are resolved to
/// submission-value tokens; excluded component ids are resolved to form keys,
/// silently dropping any id the form no longer knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailHandler {
    /// Handler id, derived from the source rule id (`email_<eid>`).
    pub id: String,

    /// Display label.
    pub label: String,

    /// Recipient address or submission-value token.
    pub to: String,

    /// Sender address or submission-value token.
    pub from: String,

    /// Sender display name or submission-value token.
    pub from_name: String,

    /// Subject line or submission-value token.
    pub subject: String,

    /// Message body.
    pub body: String,

    /// Send as HTML.
    pub html: bool,

    /// Attach uploaded files.
    pub attachments: bool,

    /// Form keys excluded from the submission digest.
    pub excluded: BTreeSet<String>,
}
