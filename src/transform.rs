//! The conversion pipeline.
//!
//! [`convert_form`] drives one form through the full sequence: tree
//! reconstruction, page segmentation, conditional translation, element
//! rendering and document assembly, plus the email handler, access table and
//! settings builders. The pipeline is deterministic apart from the generated
//! form uuid: the same source rows always produce the same elements document.

pub mod access;
pub mod conditionals;
pub mod document;
pub mod emails;
pub mod pages;
pub mod render;
pub mod tree;

use std::collections::HashMap;

use thiserror::Error;
use tracing::instrument;

use crate::{
    domain::{AccessTable, Component, EmailHandler, FormSettings},
    source::FormRepository,
    transform::{document::DocumentBuilder, pages::PageTracker},
};

/// A conversion failure that discards the whole form.
///
/// Everything recoverable (unknown operators, unmapped references, unknown
/// component types) degrades inside the pipeline instead of surfacing here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The source schema predates conditional-action support.
    #[error("source schema has no conditional-action tables; too old to convert")]
    UnsupportedSourceVersion,

    /// A conditional rule resolved to no state key at all.
    #[error("form {nid}: conditional rule on '{form_key}' has an empty action")]
    MalformedConditionalRule {
        /// The form being converted.
        nid: u64,
        /// Form key of the rule's source component.
        form_key: String,
    },

    /// The repository knows no form with this id.
    #[error("form {0} not found in source")]
    FormNotFound(u64),
}

/// Everything produced for one converted form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormOutput {
    /// Source form id.
    pub nid: u64,

    /// The hierarchical elements document.
    pub elements: String,

    /// Converted email handlers, in source rule order.
    pub handlers: Vec<EmailHandler>,

    /// Converted access table.
    pub access: AccessTable,

    /// Converted form-level settings.
    pub settings: FormSettings,
}

/// Converts one form end to end.
///
/// # Errors
///
/// Returns [`TransformError::FormNotFound`] for an unknown id,
/// [`TransformError::UnsupportedSourceVersion`] when the source schema
/// predates conditional actions, and
/// [`TransformError::MalformedConditionalRule`] when a rule carries an empty
/// action with a surviving predicate. Any error discards the form's output
/// entirely.
#[instrument(skip(repo))]
pub fn convert_form(repo: &impl FormRepository, nid: u64) -> Result<FormOutput, TransformError> {
    if !repo.has_conditional_actions() {
        return Err(TransformError::UnsupportedSourceVersion);
    }
    let record = repo.form(nid).ok_or(TransformError::FormNotFound(nid))?;

    let (mut nodes, xref) = tree::build(record.components.clone());
    let multi_page = pages::segment(&mut nodes);

    let components_by_id: HashMap<u64, &Component> = nodes
        .iter()
        .map(|node| (node.component.cid, &node.component))
        .collect();

    let mut tracker = PageTracker::new();
    let mut doc = DocumentBuilder::new();

    if multi_page {
        // Everything before the first page break lives in a synthetic
        // leading page.
        let token = tracker.open_page("first_page");
        doc.push(format!(
            "first_page:\n  '#type': webform_wizard_page\n  '#open': true\n  '#title': \"{token}\"\n"
        ));
    }

    for node in &nodes {
        let rules = record.conditionals_for(node.component.cid);
        let states = conditionals::translate(&rules, &xref, &components_by_id).map_err(
            |malformed| TransformError::MalformedConditionalRule {
                nid,
                form_key: xref
                    .get(&malformed.source)
                    .cloned()
                    .unwrap_or_else(|| node.form_key().to_string()),
            },
        )?;
        doc.push(render::element(node, states.as_ref(), &mut tracker));
    }

    let elements = doc.finish(&tracker.finish());

    Ok(FormOutput {
        nid,
        elements,
        handlers: emails::build(&record.emails, &xref),
        access: access::build(&record.roles),
        settings: FormSettings::from_form_row(
            &record.title,
            record.status,
            &record.redirect_url,
            record.submit_limit,
            record.total_submit_limit,
        ),
    })
}
