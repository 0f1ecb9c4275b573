use std::{fs::File, io, io::BufReader, path::Path};

use serde::Deserialize;
use tracing::instrument;

use crate::source::{FormRecord, FormRepository};

/// A [`FormRepository`] backed by a JSON dump of the legacy tables.
///
/// The dump holds one entry per form, with the form's components,
/// conditional rows, email rows and role rows inlined. Components are
/// re-sorted by `(pid, weight)` on load so the tree builder's ordering
/// precondition holds regardless of how the dump was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSource {
    dump: Dump,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Dump {
    /// Whether the dumped schema carries conditional-action tables.
    #[serde(default = "default_true")]
    has_conditional_actions: bool,

    #[serde(default)]
    forms: Vec<FormRecord>,
}

const fn default_true() -> bool {
    true
}

/// Errors that can occur when loading a source dump.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The dump file could not be read.
    #[error("failed to read source dump")]
    Io(#[from] io::Error),
    /// The dump file is not valid JSON or has an unexpected shape.
    #[error("failed to parse source dump")]
    Json(#[from] serde_json::Error),
}

impl JsonSource {
    /// Loads a source dump from a file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or parsed.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        let dump = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::from_dump(dump))
    }

    /// Parses a source dump from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the string cannot be parsed.
    pub fn from_str(json: &str) -> Result<Self, LoadError> {
        let dump = serde_json::from_str(json)?;
        Ok(Self::from_dump(dump))
    }

    fn from_dump(mut dump: Dump) -> Self {
        for form in &mut dump.forms {
            form.components
                .sort_by_key(|component| (component.pid, component.weight));
        }
        Self { dump }
    }
}

impl FormRepository for JsonSource {
    fn form_ids(&self) -> Vec<u64> {
        self.dump.forms.iter().map(|form| form.nid).collect()
    }

    fn form(&self, nid: u64) -> Option<&FormRecord> {
        self.dump.forms.iter().find(|form| form.nid == nid)
    }

    fn has_conditional_actions(&self) -> bool {
        self.dump.has_conditional_actions
    }
}
