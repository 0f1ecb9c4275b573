use serde::Deserialize;
use std::fmt;

/// One field, widget, fieldset, or page break from the legacy flat component
/// table.
///
/// Components arrive ordered by `(pid, weight)` — the repository's read order
/// — and carry an opaque per-type configuration blob in [`ComponentExtra`].
/// The `cid` is unique within one form; `pid` points at the parent component
/// (`0` for top-level components).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Component {
    /// Component id, unique within one form.
    pub cid: u64,

    /// Parent component id. `0` means the component sits at the form root.
    #[serde(default)]
    pub pid: u64,

    /// Sibling ordering weight.
    #[serde(default)]
    pub weight: i64,

    /// The stable key used to reference this component in rules and in the
    /// converted document.
    pub form_key: String,

    /// Human-readable label.
    #[serde(default)]
    pub name: String,

    /// The component type.
    #[serde(rename = "type")]
    pub kind: ComponentType,

    /// Default value (or, for markup components, the markup text).
    #[serde(default)]
    pub value: String,

    /// Whether the field is required.
    #[serde(default)]
    pub required: bool,

    /// Type-specific configuration.
    #[serde(default)]
    pub extra: ComponentExtra,
}

/// The closed set of legacy component types.
///
/// Types without a dedicated rendering rule are preserved as
/// [`ComponentType::Other`] and degrade to a bare element header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ComponentType {
    /// Grouping container; also supplies wizard-page titles.
    Fieldset,
    /// Single-line text input.
    Textfield,
    /// Multi-line text input.
    Textarea,
    /// Option-based input (select/radios/checkboxes, depending on config).
    Select,
    /// Email address input.
    Email,
    /// Numeric input, rendered as a sized field or an enumerated select.
    Number,
    /// Static markup block.
    Markup,
    /// File upload.
    File,
    /// Date input.
    Date,
    /// Time input.
    Time,
    /// Hidden value.
    Hidden,
    /// Page-break marker separating wizard pages.
    Pagebreak,
    /// Any type without a dedicated mapping.
    Other(String),
}

impl From<String> for ComponentType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "fieldset" => Self::Fieldset,
            "textfield" => Self::Textfield,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "email" => Self::Email,
            "number" => Self::Number,
            "markup" => Self::Markup,
            "file" => Self::File,
            "date" => Self::Date,
            "time" => Self::Time,
            "hidden" => Self::Hidden,
            "pagebreak" => Self::Pagebreak,
            _ => Self::Other(s),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fieldset => "fieldset",
            Self::Textfield => "textfield",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Email => "email",
            Self::Number => "number",
            Self::Markup => "markup",
            Self::File => "file",
            Self::Date => "date",
            Self::Time => "time",
            Self::Hidden => "hidden",
            Self::Pagebreak => "pagebreak",
            Self::Other(name) => name,
        };
        f.write_str(name)
    }
}

/// The per-type configuration blob attached to a component.
///
/// The legacy schema stores this as an opaque serialized map whose keys vary
/// by component type; unknown keys are ignored and missing keys fall back to
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComponentExtra {
    /// Help text shown with the element.
    pub description: String,

    /// Newline-delimited option source. Each line is either `<group label>`
    /// (opens an option sub-group), `key|label`, or a bare `key`.
    pub items: String,

    /// For option components: render as a list box rather than
    /// radios/checkboxes.
    pub aslist: bool,

    /// For option components: allow multiple selections.
    pub multiple: bool,

    /// Display width, also used as the rendered field size.
    pub width: Option<u64>,

    /// For number components: the widget to render (`textfield` or `select`).
    #[serde(rename = "type")]
    pub number_kind: String,

    /// Lower bound for number components.
    pub min: Option<f64>,

    /// Upper bound for number components.
    pub max: Option<f64>,

    /// Step for number components; defaults to 1 when range-enumerated.
    pub step: Option<f64>,

    /// Whether number values must be unique across submissions.
    pub unique: Option<bool>,

    /// Text placed before the input.
    pub field_prefix: String,

    /// Text placed after the input.
    pub field_suffix: String,

    /// Where the title is displayed (`before` is the implicit default;
    /// `none` normalizes to `invisible`).
    pub title_display: String,

    /// For time components: `12-hour` or `24-hour`.
    pub hourformat: String,

    /// For file components: upload restrictions.
    pub filtering: FileFiltering,
}

impl ComponentExtra {
    /// Returns the non-empty, trimmed option lines from `items`.
    #[must_use]
    pub fn option_lines(&self) -> Vec<&str> {
        self.items
            .trim()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Upload restrictions for file components.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileFiltering {
    /// Base extension allow-list.
    pub types: Vec<String>,

    /// Comma-separated extra extensions merged into `types`.
    pub addextensions: String,

    /// Maximum upload size in bytes.
    pub size: Option<f64>,
}
