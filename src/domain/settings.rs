use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

static NON_MACHINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]+").expect("valid regex"));
static UNDERSCORE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// Whether the converted form accepts submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    /// The form is accepting submissions.
    Open,
    /// The form is closed.
    Closed,
}

/// How the confirmation is presented after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationType {
    /// Dedicated confirmation page.
    Page,
    /// Confirmation shown inline on the form.
    Inline,
    /// Redirect to a URL.
    Url,
}

/// Form-level settings mapped from the legacy form row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSettings {
    /// Machine name derived from the form title.
    pub machine_name: String,

    /// Generated unique id for the converted form, truncated to 32
    /// characters.
    pub uuid: String,

    /// Open/closed status.
    pub status: FormStatus,

    /// Confirmation presentation.
    pub confirmation_type: ConfirmationType,

    /// Redirect target; empty unless `confirmation_type` is `url`.
    pub redirect_url: String,

    /// Per-user submission limit; `None` when unlimited.
    pub submit_limit: Option<i64>,

    /// Form-wide submission limit; `None` when unlimited.
    pub total_submit_limit: Option<i64>,
}

impl FormSettings {
    /// Maps the legacy form row fields into converted settings.
    ///
    /// The sentinel redirect values `<confirmation>` and `<none>` select the
    /// page and inline confirmation types respectively and clear the URL;
    /// anything else is a redirect URL. Negative submission limits mean
    /// "unlimited".
    #[must_use]
    pub fn from_form_row(
        title: &str,
        open: bool,
        redirect_url: &str,
        submit_limit: i64,
        total_submit_limit: i64,
    ) -> Self {
        let (confirmation_type, redirect_url) = match redirect_url {
            "<confirmation>" => (ConfirmationType::Page, String::new()),
            "<none>" => (ConfirmationType::Inline, String::new()),
            url => (ConfirmationType::Url, url.to_string()),
        };

        Self {
            machine_name: machine_name(title),
            uuid: generate_uuid(),
            status: if open {
                FormStatus::Open
            } else {
                FormStatus::Closed
            },
            confirmation_type,
            redirect_url,
            submit_limit: (submit_limit >= 0).then_some(submit_limit),
            total_submit_limit: (total_submit_limit >= 0).then_some(total_submit_limit),
        }
    }
}

/// Derives a machine name from a form title: lowercase, with every run of
/// characters outside `[a-z0-9_]` collapsed to a single underscore.
#[must_use]
pub fn machine_name(title: &str) -> String {
    let lower = title.to_lowercase();
    let replaced = NON_MACHINE.replace_all(&lower, "_");
    UNDERSCORE_RUNS.replace_all(&replaced, "_").into_owned()
}

/// Generates a 32-character unique id for the converted form.
fn generate_uuid() -> String {
    let mut id = Uuid::new_v4().to_string();
    id.truncate(32);
    id
}
