//! Multi-page segmentation and deferred page-title resolution.
//!
//! A page's title is not known when its header is written: it comes from the
//! first fieldset inside the page, or falls back to `Page N` when the page
//! closes without one. Headers therefore carry placeholder tokens, and the
//! [`PageTracker`] collects token→title resolutions for the serializer to
//! apply in one pass after the full sequence is rendered.

use std::collections::HashMap;

use crate::{
    domain::ComponentType,
    transform::{document::clean_string, tree::TreeNode},
};

/// Re-wraps the ordered sequence into wizard pages.
///
/// Returns `false` (and leaves the nodes untouched) when the form has no
/// page breaks. Otherwise every non-pagebreak node is indented one extra
/// level to live inside a page container, and the caller must open a
/// synthetic leading page before the first node.
pub fn segment(nodes: &mut [TreeNode]) -> bool {
    if !nodes
        .iter()
        .any(|node| node.component.kind == ComponentType::Pagebreak)
    {
        return false;
    }

    for node in nodes.iter_mut() {
        if node.component.kind != ComponentType::Pagebreak {
            node.depth += 1;
        }
    }
    true
}

/// Tracks open pages and accumulates title placeholder resolutions.
#[derive(Debug, Default)]
pub struct PageTracker {
    pages_opened: usize,
    current: Option<OpenPage>,
    titles: HashMap<String, String>,
}

#[derive(Debug)]
struct OpenPage {
    token: String,
    number: usize,
    title: Option<String>,
}

impl PageTracker {
    /// Creates a tracker with no open page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the current page (if any) and opens a new one keyed by
    /// `form_key`, returning the placeholder token to embed as its title.
    pub fn open_page(&mut self, form_key: &str) -> String {
        self.close_current();
        self.pages_opened += 1;
        let token = format!("{{{form_key}_title}}");
        self.current = Some(OpenPage {
            token: token.clone(),
            number: self.pages_opened,
            title: None,
        });
        token
    }

    /// Records a fieldset label. The first non-empty label seen inside a
    /// page becomes that page's title, escaped like any other free text
    /// embedded in the document.
    pub fn note_fieldset(&mut self, label: &str) {
        if let Some(page) = &mut self.current {
            if page.title.is_none() && !label.is_empty() {
                page.title = Some(clean_string(label));
            }
        }
    }

    /// Closes the final page and returns the token→title substitution map.
    #[must_use]
    pub fn finish(mut self) -> HashMap<String, String> {
        self.close_current();
        self.titles
    }

    fn close_current(&mut self) {
        if let Some(page) = self.current.take() {
            let title = page
                .title
                .unwrap_or_else(|| format!("Page {}", page.number));
            self.titles.insert(page.token, title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Component, ComponentExtra};

    fn node(kind: ComponentType, depth: usize) -> TreeNode {
        TreeNode {
            component: Component {
                cid: 1,
                pid: 0,
                weight: 0,
                form_key: "k".to_string(),
                name: String::new(),
                kind,
                value: String::new(),
                required: false,
                extra: ComponentExtra::default(),
            },
            depth,
        }
    }

    #[test]
    fn single_page_form_is_untouched() {
        let mut nodes = vec![node(ComponentType::Textfield, 0), node(ComponentType::Fieldset, 1)];

        assert!(!segment(&mut nodes));
        assert_eq!(nodes[0].depth, 0);
        assert_eq!(nodes[1].depth, 1);
    }

    #[test]
    fn page_breaks_indent_everything_else() {
        let mut nodes = vec![
            node(ComponentType::Textfield, 0),
            node(ComponentType::Pagebreak, 0),
            node(ComponentType::Textfield, 1),
        ];

        assert!(segment(&mut nodes));
        assert_eq!(nodes[0].depth, 1);
        assert_eq!(nodes[1].depth, 0);
        assert_eq!(nodes[2].depth, 2);
    }

    #[test]
    fn pages_default_to_numbered_titles() {
        let mut tracker = PageTracker::new();
        let first = tracker.open_page("first_page");
        let second = tracker.open_page("break1");
        let titles = tracker.finish();

        assert_eq!(first, "{first_page_title}");
        assert_eq!(second, "{break1_title}");
        assert_eq!(titles[&first], "Page 1");
        assert_eq!(titles[&second], "Page 2");
    }

    #[test]
    fn first_fieldset_label_titles_the_page() {
        let mut tracker = PageTracker::new();
        let first = tracker.open_page("first_page");
        tracker.note_fieldset("About You");
        tracker.note_fieldset("Ignored Later Fieldset");
        let second = tracker.open_page("break1");
        let titles = tracker.finish();

        assert_eq!(titles[&first], "About You");
        assert_eq!(titles[&second], "Page 2");
    }

    #[test]
    fn fieldset_label_is_escaped_before_substitution() {
        let mut tracker = PageTracker::new();
        let token = tracker.open_page("first_page");
        tracker.note_fieldset("About\n\"You\": ok");
        let titles = tracker.finish();

        assert_eq!(titles[&token], "About\\n'You': ok");
    }

    #[test]
    fn empty_fieldset_label_falls_through_to_default() {
        let mut tracker = PageTracker::new();
        let token = tracker.open_page("first_page");
        tracker.note_fieldset("");
        let titles = tracker.finish();

        assert_eq!(titles[&token], "Page 1");
    }

    #[test]
    fn fieldset_outside_any_page_is_ignored() {
        let mut tracker = PageTracker::new();
        tracker.note_fieldset("No Page Open");
        assert!(tracker.finish().is_empty());
    }
}
