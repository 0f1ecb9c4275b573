//! Email notification rule conversion.

use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    domain::{EmailHandler, EmailRule},
    transform::tree::CrossReference,
};

/// Converts the form's email rules into handler records.
///
/// Address-like fields holding a bare component id are resolved through the
/// cross-reference into a submission-value token; ids the form no longer
/// knows are left as literal text. Excluded component ids resolve to form
/// keys, and unresolvable ids are dropped.
#[must_use]
pub fn build(rules: &[EmailRule], xref: &CrossReference) -> Vec<EmailHandler> {
    rules
        .iter()
        .map(|rule| EmailHandler {
            id: format!("email_{}", rule.eid),
            label: format!("Email {}", rule.eid),
            to: resolve_reference(&rule.email, xref),
            from: resolve_reference(&rule.from_address, xref),
            from_name: resolve_reference(&rule.from_name, xref),
            subject: resolve_reference(&rule.subject, xref),
            body: rule.template.clone(),
            html: rule.html,
            attachments: rule.attachments,
            excluded: resolve_excluded(&rule.excluded_components, xref),
        })
        .collect()
}

/// Replaces a bare component id with its submission-value token; anything
/// else passes through unchanged.
fn resolve_reference(field: &str, xref: &CrossReference) -> String {
    if field.is_empty() {
        return String::new();
    }
    if let Ok(cid) = field.parse::<u64>() {
        if let Some(key) = xref.get(&cid) {
            return format!("[webform-submission:values:{key}:raw]");
        }
        debug!(cid, "email field references an unknown component");
    }
    field.to_string()
}

fn resolve_excluded(excluded_components: &str, xref: &CrossReference) -> BTreeSet<String> {
    excluded_components
        .split(',')
        .filter_map(|id| id.trim().parse::<u64>().ok())
        .filter_map(|cid| xref.get(&cid).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(eid: u64) -> EmailRule {
        EmailRule {
            eid,
            email: "admin@example.com".to_string(),
            subject: "New submission".to_string(),
            from_name: "Site".to_string(),
            from_address: "noreply@example.com".to_string(),
            template: "Submitted values:".to_string(),
            excluded_components: String::new(),
            html: true,
            attachments: false,
        }
    }

    fn xref() -> CrossReference {
        CrossReference::from([(3, "email_address".to_string()), (7, "name_2".to_string())])
    }

    #[test]
    fn literal_fields_pass_through() {
        let handlers = build(&[rule(1)], &xref());

        assert_eq!(handlers.len(), 1);
        let handler = &handlers[0];
        assert_eq!(handler.id, "email_1");
        assert_eq!(handler.label, "Email 1");
        assert_eq!(handler.to, "admin@example.com");
        assert_eq!(handler.from, "noreply@example.com");
        assert_eq!(handler.subject, "New submission");
        assert!(handler.html);
        assert!(handler.excluded.is_empty());
    }

    #[test]
    fn numeric_fields_resolve_to_submission_tokens() {
        let mut numeric = rule(2);
        numeric.email = "3".to_string();
        numeric.from_name = "7".to_string();

        let handlers = build(&[numeric], &xref());

        assert_eq!(handlers[0].to, "[webform-submission:values:email_address:raw]");
        assert_eq!(handlers[0].from_name, "[webform-submission:values:name_2:raw]");
    }

    #[test]
    fn unknown_numeric_reference_stays_literal() {
        let mut stray = rule(3);
        stray.email = "99".to_string();

        let handlers = build(&[stray], &xref());
        assert_eq!(handlers[0].to, "99");
    }

    #[test]
    fn excluded_ids_resolve_and_unknown_ids_drop() {
        let mut excluding = rule(4);
        excluding.excluded_components = "3, 99 ,7,junk".to_string();

        let handlers = build(&[excluding], &xref());

        let expected: BTreeSet<String> =
            ["email_address".to_string(), "name_2".to_string()].into();
        assert_eq!(handlers[0].excluded, expected);
    }
}
