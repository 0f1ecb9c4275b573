use serde::Deserialize;

/// One joined conditional rule row.
///
/// The legacy schema splits conditionals across three tables (rule groups,
/// actions, predicates); the repository supplies the join, so each row pairs
/// one action with one predicate. Rows addressed to the same `target` are
/// translated together into that element's state block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionalRule {
    /// Rule group id.
    #[serde(default)]
    pub rgid: u64,

    /// The component the action applies to.
    pub target: u64,

    /// What happens when the predicate holds.
    pub action: RuleAction,

    /// Invert the action's polarity.
    #[serde(default)]
    pub invert: bool,

    /// The component whose value the predicate inspects.
    pub source: u64,

    /// Predicate operator.
    pub operator: RuleOperator,

    /// Predicate comparison value.
    #[serde(default)]
    pub value: String,
}

/// The action half of a conditional rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RuleAction {
    /// Show (or, inverted, hide) the target element.
    Show,
    /// Require (or, inverted, make optional) the target element.
    Require,
    /// Set the target's value. Has no equivalent in the output model and is
    /// dropped during translation.
    Set,
    /// Any action without a mapping; dropped during translation. An empty
    /// action string is malformed and fails the form's conversion.
    Other(String),
}

impl From<String> for RuleAction {
    fn from(s: String) -> Self {
        match s.as_str() {
            "show" => Self::Show,
            "require" => Self::Require,
            "set" => Self::Set,
            _ => Self::Other(s),
        }
    }
}

/// The predicate half of a conditional rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RuleOperator {
    /// Source value equals the rule value.
    Equal,
    /// Source value differs from the rule value. The output model has no
    /// native inequality predicate, so translation flips the state polarity.
    NotEqual,
    /// Numeric comparison; unsupported downstream, predicate is dropped.
    LessThan,
    /// Numeric comparison; unsupported downstream, predicate is dropped.
    LessThanEqual,
    /// Numeric comparison; unsupported downstream, predicate is dropped.
    GreaterThan,
    /// Numeric comparison; unsupported downstream, predicate is dropped.
    GreaterThanEqual,
    /// Source value is empty (or, for checkables, unchecked).
    Empty,
    /// Source value is filled (or, for checkables, checked).
    NotEmpty,
    /// Any operator without a mapping; predicate is dropped.
    Other(String),
}

impl From<String> for RuleOperator {
    fn from(s: String) -> Self {
        match s.as_str() {
            "equal" => Self::Equal,
            "not_equal" => Self::NotEqual,
            "less_than" => Self::LessThan,
            "less_than_equal" => Self::LessThanEqual,
            "greater_than" => Self::GreaterThan,
            "greater_than_equal" => Self::GreaterThanEqual,
            "empty" => Self::Empty,
            "not_empty" => Self::NotEmpty,
            _ => Self::Other(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_row_deserializes() {
        let rule: ConditionalRule = serde_json::from_str(
            r#"{"rgid": 1, "target": 3, "action": "show", "invert": true,
                "source": 2, "operator": "not_equal", "value": "yes"}"#,
        )
        .unwrap();

        assert_eq!(rule.action, RuleAction::Show);
        assert!(rule.invert);
        assert_eq!(rule.operator, RuleOperator::NotEqual);
    }

    #[test]
    fn unknown_action_and_operator_are_preserved() {
        assert_eq!(
            RuleAction::from("toggle".to_string()),
            RuleAction::Other("toggle".to_string())
        );
        assert_eq!(
            RuleOperator::from("matches".to_string()),
            RuleOperator::Other("matches".to_string())
        );
    }
}
