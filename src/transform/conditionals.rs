//! Translation of relational conditional rules into declarative states.
//!
//! The source model is a set of joined (action, predicate) rows per target
//! component; the output model is a mapping from an element state
//! (`visible`, `invisible`, `required`, `optional`) to selector/condition
//! pairs. The two models do not line up exactly: inequality and numeric
//! comparisons have no downstream predicate, and value-setting actions have
//! no downstream effect, so those rows degrade by omission.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    domain::{Component, ComponentType, ConditionalRule, RuleAction, RuleOperator},
    transform::{document::yaml_scalar, tree::CrossReference},
};

/// A declarative condition attached to a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The source element holds exactly this value.
    Value(String),
    /// The source element is empty.
    Empty,
    /// The source checkbox is unchecked.
    Unchecked,
    /// The source checkbox is checked.
    Checked,
    /// The source element is not filled.
    Unfilled,
}

impl Condition {
    /// Renders the condition as a single `key: value` document line.
    #[must_use]
    pub(crate) fn render(&self) -> String {
        match self {
            Self::Value(value) => format!("value: {}", yaml_scalar(value)),
            Self::Empty => "empty: true".to_string(),
            Self::Unchecked => "unchecked: true".to_string(),
            Self::Checked => "checked: true".to_string(),
            Self::Unfilled => "filled: false".to_string(),
        }
    }
}

/// The translated state block for one element.
///
/// State names keep first-appearance order so re-running the conversion
/// reproduces byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementStates {
    entries: Vec<(&'static str, Vec<(String, Condition)>)>,
}

impl ElementStates {
    fn push(&mut self, state: &'static str, selector: String, condition: Condition) {
        if let Some((_, pairs)) = self.entries.iter_mut().find(|(name, _)| *name == state) {
            pairs.push((selector, condition));
        } else {
            self.entries.push((state, vec![(selector, condition)]));
        }
    }

    /// Iterates states in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[(String, Condition)])> {
        self.entries
            .iter()
            .map(|(name, pairs)| (*name, pairs.as_slice()))
    }

    /// Whether no predicate survived translation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A rule row whose action resolves to no state key at all.
///
/// Emitting an empty state key would corrupt the document grammar, so this
/// is fatal for the whole form rather than recoverable by omission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRule {
    /// The predicate's source component id, for diagnostics.
    pub source: u64,
}

/// Translates the rule rows addressed to one target component.
///
/// Returns `Ok(None)` when no predicate survives — dropped rows are normal
/// degradation, not an error.
///
/// # Errors
///
/// Returns [`MalformedRule`] when a surviving predicate's action carries an
/// empty state key.
pub fn translate(
    rules: &[&ConditionalRule],
    xref: &CrossReference,
    components: &HashMap<u64, &Component>,
) -> Result<Option<ElementStates>, MalformedRule> {
    let mut states = ElementStates::default();

    for rule in rules {
        let base_state = match &rule.action {
            RuleAction::Show => Some(if rule.invert { "invisible" } else { "visible" }),
            RuleAction::Require => Some(if rule.invert { "optional" } else { "required" }),
            RuleAction::Set => {
                debug!(target_cid = rule.target, "dropping unsupported 'set' action");
                continue;
            }
            RuleAction::Other(name) if name.is_empty() => None,
            RuleAction::Other(name) => {
                debug!(action = %name, "dropping unknown conditional action");
                continue;
            }
        };

        let Some(source) = components.get(&rule.source) else {
            debug!(source_cid = rule.source, "dropping predicate with unknown source");
            continue;
        };

        let value = rule.value.trim();
        let mut resolved_state = base_state;
        let mut condition = match &rule.operator {
            RuleOperator::Equal => Condition::Value(value.to_string()),
            RuleOperator::NotEqual => {
                // No native inequality predicate exists downstream, so the
                // state polarity is reversed instead.
                resolved_state = Some(if rule.invert { "visible" } else { "invisible" });
                Condition::Value(value.to_string())
            }
            RuleOperator::LessThan
            | RuleOperator::LessThanEqual
            | RuleOperator::GreaterThan
            | RuleOperator::GreaterThanEqual => {
                debug!(operator = ?rule.operator, "dropping unsupported comparison predicate");
                continue;
            }
            RuleOperator::Empty => {
                if value == "checked" {
                    Condition::Unchecked
                } else {
                    Condition::Empty
                }
            }
            RuleOperator::NotEmpty => {
                if value == "checked" {
                    Condition::Checked
                } else {
                    Condition::Unfilled
                }
            }
            RuleOperator::Other(name) => {
                debug!(operator = %name, "dropping unknown conditional operator");
                continue;
            }
        };

        let state = resolved_state.ok_or(MalformedRule {
            source: rule.source,
        })?;

        // Non-list multi-valued sources render as named checkboxes/radios
        // downstream, so the selector addresses the single option input.
        let mut key = xref
            .get(&rule.source)
            .cloned()
            .unwrap_or_else(|| source.form_key.clone());
        if !source.extra.aslist
            && source.extra.multiple
            && source.extra.option_lines().len() > 1
        {
            key = format!("{key}[{value}]");
            if source.kind == ComponentType::Select {
                condition = Condition::Checked;
            }
        }

        states.push(state, format!(":input[name=\"{key}\"]"), condition);
    }

    if states.is_empty() {
        Ok(None)
    } else {
        Ok(Some(states))
    }
}
