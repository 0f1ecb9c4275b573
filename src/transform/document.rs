//! Fragment accumulation and final document assembly.
//!
//! The output grammar is indentation-structured text: each entry is
//! `<indent><key>:` followed by `<indent+2>'#attribute': value` lines, two
//! spaces per nesting level. Page titles are not known while their headers
//! are being written, so fragments carry placeholder tokens and the builder
//! substitutes them in one pass at the end rather than mutating
//! already-emitted text mid-stream.

use std::collections::HashMap;

/// Accumulates rendered element fragments and assembles the final document.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    fragments: Vec<String>,
}

impl DocumentBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one rendered fragment in traversal order.
    pub fn push(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    /// Concatenates the fragments and applies the page-title substitutions.
    #[must_use]
    pub fn finish(self, titles: &HashMap<String, String>) -> String {
        let mut output = self.fragments.concat();
        for (token, title) in titles {
            output = output.replace(token, title);
        }
        output
    }
}

/// Escapes free text for embedding in the document: double quotes become
/// single quotes, carriage returns are stripped, and newlines become the
/// two-character `\n` escape.
#[must_use]
pub(crate) fn clean_string(text: &str) -> String {
    text.replace('"', "'").replace('\r', "").replace('\n', "\\n")
}

/// Renders a scalar value, single-quoting it when it would otherwise be
/// misread by an indentation-structured parser (empty strings, leading or
/// trailing whitespace, structural punctuation).
#[must_use]
pub(crate) fn yaml_scalar(value: &str) -> String {
    let plain = !value.is_empty()
        && !value.starts_with(char::is_whitespace)
        && !value.ends_with(char::is_whitespace)
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.' | '/' | '@'))
        && !value.starts_with('-');

    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

/// Formats a numeric attribute value, printing whole numbers without a
/// fractional part.
#[must_use]
pub(crate) fn format_number(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_concatenates_in_order() {
        let mut builder = DocumentBuilder::new();
        builder.push("a:\n".to_string());
        builder.push("b:\n".to_string());

        assert_eq!(builder.finish(&HashMap::new()), "a:\nb:\n");
    }

    #[test]
    fn finish_substitutes_every_token_occurrence() {
        let mut builder = DocumentBuilder::new();
        builder.push("first_page:\n  '#title': {first_page_title}\n".to_string());
        builder.push("break1:\n  '#title': {break1_title}\n".to_string());

        let titles = HashMap::from([
            ("{first_page_title}".to_string(), "Page 1".to_string()),
            ("{break1_title}".to_string(), "Details".to_string()),
        ]);
        let output = builder.finish(&titles);

        assert!(output.contains("'#title': Page 1"));
        assert!(output.contains("'#title': Details"));
        assert!(!output.contains("_title}"));
    }

    #[test]
    fn clean_string_escapes_quotes_and_newlines() {
        assert_eq!(clean_string("say \"hi\"\r\nbye"), "say 'hi'\\nbye");
        assert_eq!(clean_string("plain"), "plain");
    }

    #[test]
    fn yaml_scalar_quotes_structural_text() {
        assert_eq!(yaml_scalar("yes"), "yes");
        assert_eq!(yaml_scalar("two words"), "two words");
        assert_eq!(yaml_scalar(""), "''");
        assert_eq!(yaml_scalar("a: b"), "'a: b'");
        assert_eq!(yaml_scalar("it's"), "'it''s'");
        assert_eq!(yaml_scalar(" padded "), "' padded '");
    }

    #[test]
    fn format_number_trims_whole_values() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-1.0), "-1");
    }
}
