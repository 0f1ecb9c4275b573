//! Per-type element rendering.
//!
//! Each tree node is rendered to an indented text fragment: the element
//! header, a type-specific attribute block, then the common attributes in
//! fixed order. The type table is closed — every source type maps through
//! one dispatch match, and types without a mapping degrade to a bare header
//! with common attributes only.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
    domain::ComponentType,
    transform::{
        conditionals::ElementStates,
        document::{clean_string, format_number, yaml_scalar},
        pages::PageTracker,
        tree::TreeNode,
    },
};

/// Matches an option line that opens an option sub-group: `<group label>`.
static OPTION_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<(.*)>$").expect("valid regex"));

/// Renders one element to a document fragment.
///
/// `tracker` records page openings (for pagebreak nodes) and fieldset labels
/// (candidate page titles); on single-page forms it simply never has an open
/// page and both are no-ops.
pub fn element(
    node: &TreeNode,
    states: Option<&ElementStates>,
    tracker: &mut PageTracker,
) -> String {
    let component = &node.component;
    let extra = &component.extra;
    let indent = "  ".repeat(node.depth);

    // Fieldsets get their own key prefix so they never collide with the
    // fields they contain.
    let mut display_key = component.form_key.clone();
    if component.kind == ComponentType::Fieldset && !display_key.contains("fieldset") {
        display_key = format!("fieldset_{display_key}");
    }

    let mut description = clean_string(&extra.description).trim().to_string();
    let lines = extra.option_lines();
    let (options, valid_options) = option_list(&indent, &lines);
    let mut value = component.value.clone();

    let mut markup = format!("{indent}{display_key}:\n");

    match &component.kind {
        ComponentType::Fieldset => {
            tracker.note_fieldset(&component.name);
            markup.push_str(&format!(
                "{indent}  '#type': fieldset\n{indent}  '#open': true\n"
            ));
        }

        ComponentType::Textfield => {
            markup.push_str(&format!("{indent}  '#type': textfield\n"));
            if let Some(width) = extra.width {
                markup.push_str(&format!("{indent}  '#size': {width}\n"));
            }
        }

        ComponentType::Textarea => {
            markup.push_str(&format!("{indent}  '#type': textarea\n"));
        }

        ComponentType::Select => {
            let select_type = if extra.aslist {
                "select"
            } else if extra.multiple && lines.len() > 1 {
                "checkboxes"
            } else if extra.multiple && lines.len() == 1 {
                // A single option renders as one named checkbox whose
                // description is the option label.
                description = lines[0]
                    .split_once('|')
                    .map_or_else(String::new, |(_, label)| {
                        clean_string(label).trim().to_string()
                    });
                "checkbox"
            } else {
                "radios"
            };
            markup.push_str(&format!("{indent}  '#type': {select_type}\n"));
            markup.push_str(&format!("{indent}  '#options':\n{options}"));
            if extra.multiple {
                markup.push_str(&format!("{indent}  '#multiple': true\n"));
            }
        }

        ComponentType::Email => {
            markup.push_str(&format!(
                "{indent}  '#type': email\n{indent}  '#size': 20\n"
            ));
        }

        ComponentType::Number => {
            if extra.number_kind == "select" {
                markup.push_str(&format!("{indent}  '#type': select\n"));
                markup.push_str(&format!("{indent}  '#options':\n{options}"));
                // A range-configured number enumerates every step as an
                // option.
                if let (Some(min), Some(max)) = (extra.min, extra.max) {
                    let step = extra.step.filter(|s| *s > 0.0).unwrap_or(1.0);
                    let mut current = min;
                    while current <= max {
                        let printed = format_number(current);
                        markup.push_str(&format!("{indent}    {printed}: {printed}\n"));
                        current += step;
                    }
                }
            } else {
                markup.push_str(&format!(
                    "{indent}  '#type': textfield\n{indent}  '#size': 20\n"
                ));
            }
            if let Some(min) = extra.min {
                markup.push_str(&format!("{indent}  '#min': {}\n", format_number(min)));
            }
            if let Some(max) = extra.max {
                markup.push_str(&format!("{indent}  '#max': {}\n", format_number(max)));
            }
            if let Some(step) = extra.step {
                markup.push_str(&format!("{indent}  '#step': {}\n", format_number(step)));
            }
            if let Some(unique) = extra.unique {
                markup.push_str(&format!("{indent}  '#unique': {unique}\n"));
            }
        }

        ComponentType::Markup => {
            markup.push_str(&format!("{indent}  '#type': processed_text\n"));
            markup.push_str(&format!("{indent}  '#format': full_html\n"));
            markup.push_str(&format!("{indent}  '#title_display': invisible\n"));
            markup.push_str(&format!(
                "{indent}  '#text': \"{}\"\n",
                clean_string(&value)
            ));
            // The markup text lives in the value; clear it so it is not
            // re-emitted as a default.
            value.clear();
        }

        ComponentType::File => {
            let mut extensions = String::new();
            if !extra.filtering.types.is_empty() {
                let mut types = extra.filtering.types.clone();
                for added in extra.filtering.addextensions.split(',') {
                    let added = added.trim();
                    if !added.is_empty() && !types.iter().any(|t| t == added) {
                        types.push(added.to_string());
                    }
                }
                extensions = types.join(",");
            }
            let filesize = extra
                .filtering
                .size
                .map_or_else(String::new, |bytes| format_number(bytes / 1000.0));
            markup.push_str(&format!("{indent}  '#type': managed_file\n"));
            markup.push_str(&format!("{indent}  '#max_filesize': '{filesize}'\n"));
            markup.push_str(&format!("{indent}  '#file_extensions': '{extensions}'\n"));
            if let Some(width) = extra.width {
                markup.push_str(&format!("{indent}  '#size': {width}\n"));
            }
        }

        ComponentType::Date => {
            markup.push_str(&format!("{indent}  '#type': date\n"));
        }

        ComponentType::Time => {
            markup.push_str(&format!("{indent}  '#type': time\n"));
            match extra.hourformat.as_str() {
                "12-hour" => {
                    markup.push_str(&format!("{indent}  '#time_format': 'g:i A'\n"));
                }
                "24-hour" => {
                    markup.push_str(&format!("{indent}  '#time_format': 'H:i'\n"));
                }
                _ => {}
            }
        }

        ComponentType::Hidden => {
            markup.push_str(&format!("{indent}  '#type': hidden\n"));
        }

        ComponentType::Pagebreak => {
            let token = tracker.open_page(&display_key);
            markup.push_str(&format!(
                "{indent}  '#type': webform_wizard_page\n{indent}  '#open': true\n{indent}  '#title': \"{token}\"\n"
            ));
        }

        // Unhandled types degrade to a bare header with common attributes.
        ComponentType::Other(_) => {
            debug!(kind = %component.kind, "no rendering rule for component type");
        }
    }

    // Common attributes, fixed order.
    if !value.is_empty() && (valid_options.is_empty() || valid_options.iter().any(|o| o == &value))
    {
        markup.push_str(&format!("{indent}  '#default_value': {value}\n"));
    }
    if !extra.field_prefix.is_empty() {
        markup.push_str(&format!(
            "{indent}  '#field_prefix': {}\n",
            extra.field_prefix
        ));
    }
    if !extra.field_suffix.is_empty() {
        markup.push_str(&format!(
            "{indent}  '#field_suffix': {}\n",
            extra.field_suffix
        ));
    }
    if !extra.title_display.is_empty() && extra.title_display != "before" {
        let title_display = if extra.title_display == "none" {
            "invisible"
        } else {
            extra.title_display.as_str()
        };
        markup.push_str(&format!("{indent}  '#title_display': {title_display}\n"));
    }
    if component.kind != ComponentType::Pagebreak {
        markup.push_str(&format!(
            "{indent}  '#title': \"{}\"\n",
            clean_string(&component.name)
        ));
        if !description.is_empty() {
            markup.push_str(&format!("{indent}  '#description': \"{description}\"\n"));
        }
    }
    if component.required {
        markup.push_str(&format!("{indent}  '#required': true\n"));
    }

    if let Some(states) = states {
        if !states.is_empty() {
            markup.push_str(&format!("{indent}  '#states':\n"));
            for (state, pairs) in states.iter() {
                markup.push_str(&format!("{indent}    {state}:\n"));
                for (selector, condition) in pairs {
                    markup.push_str(&format!("{indent}      {}:\n", yaml_scalar(selector)));
                    markup.push_str(&format!("{indent}        {}\n", condition.render()));
                }
            }
        }
    }

    markup
}

/// Builds the indented option list and the set of valid option keys from
/// newline-delimited item lines.
fn option_list(indent: &str, lines: &[&str]) -> (String, Vec<String>) {
    let mut options = String::new();
    let mut valid_keys = Vec::new();
    let mut ingroup = "";

    for line in lines {
        if let Some(caps) = OPTION_GROUP.captures(line) {
            options.push_str(&format!("{indent}    '{}':\n", &caps[1]));
            ingroup = "  ";
            continue;
        }
        let (key, label) = line.split_once('|').unwrap_or((line, line));
        valid_keys.push(key.to_string());
        options.push_str(&format!("{indent}{ingroup}    {key}: {label}\n"));
    }

    (options, valid_keys)
}
