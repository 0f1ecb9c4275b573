//! Ordered, depth-annotated tree reconstruction from the flat component list.
//!
//! Components arrive as a flat parent-pointer list ordered by
//! `(pid, weight)`. [`build`] flattens them into the pre-order sequence the
//! renderer walks, annotating each node with its depth and rewriting
//! duplicate-prone form keys, and produces the id→key cross-reference the
//! conditional and email builders resolve against.

use std::collections::{HashMap, HashSet};

use tracing::instrument;

use crate::domain::Component;

/// Mapping from component id to final (possibly rewritten) form key.
///
/// Built once per form by [`build`]; consumed by the conditional translator
/// and the email handler builder.
pub type CrossReference = HashMap<u64, String>;

/// A component placed in the rendering sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// The component, with its form key already rewritten where needed.
    pub component: Component,

    /// Number of ancestors. The page segmenter bumps this by one on
    /// multi-page forms.
    pub depth: usize,
}

impl TreeNode {
    /// The node's final form key.
    #[must_use]
    pub fn form_key(&self) -> &str {
        &self.component.form_key
    }
}

/// Flattens the component list into pre-order rendering sequence.
///
/// The traversal is iterative: a work stack of parent ids with a cursor per
/// sibling group, so a parent is revisited only to continue iterating its
/// remaining children once a subtree has been emitted. Forms with thousands
/// of components therefore cost no call-stack growth.
///
/// Nested form keys are rewritten to `<key>_<pid>` because the target
/// namespace is flat and sibling fieldsets commonly reuse keys. A component
/// whose `pid` references no component in the set is treated as a child of
/// the root.
#[must_use]
#[instrument(skip(components), fields(components = components.len()))]
pub fn build(components: Vec<Component>) -> (Vec<TreeNode>, CrossReference) {
    let count = components.len();
    let known: HashSet<u64> = components.iter().map(|c| c.cid).collect();

    // Adjacency in input order, plus an arena of the components themselves.
    let mut children: HashMap<u64, Vec<u64>> = HashMap::new();
    let mut arena: HashMap<u64, Component> = HashMap::with_capacity(count);
    for component in components {
        let pid = if component.pid == 0 || known.contains(&component.pid) {
            component.pid
        } else {
            0
        };
        children.entry(pid).or_default().push(component.cid);
        arena.insert(component.cid, component);
    }

    let mut ordered = Vec::with_capacity(count);
    let mut xref = CrossReference::with_capacity(count);

    // The last stack entry is the parent whose children are being emitted;
    // the stack depth below it is the current nesting depth.
    let mut stack: Vec<u64> = vec![0];
    let mut cursors: HashMap<u64, usize> = HashMap::new();

    while let Some(parent) = stack.pop() {
        let depth = stack.len();
        let Some(siblings) = children.get(&parent) else {
            continue;
        };

        let mut cursor = cursors.get(&parent).copied().unwrap_or(0);
        let mut descended = false;
        while let Some(&cid) = siblings.get(cursor) {
            cursor += 1;

            // A duplicate cid leaves one adjacency entry with no component
            // behind it; skip it rather than abort on a malformed dump.
            let Some(mut component) = arena.remove(&cid) else {
                continue;
            };
            if depth > 0 {
                component.form_key = format!("{}_{}", component.form_key, component.pid);
            }
            xref.insert(cid, component.form_key.clone());
            ordered.push(TreeNode { component, depth });

            if children.contains_key(&cid) {
                // Park this sibling group and descend into the subtree.
                cursors.insert(parent, cursor);
                cursors.insert(cid, 0);
                stack.push(parent);
                stack.push(cid);
                descended = true;
                break;
            }
        }

        if !descended {
            cursors.insert(parent, 0);
        }
    }

    (ordered, xref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComponentExtra, ComponentType};

    fn component(cid: u64, pid: u64, weight: i64, key: &str) -> Component {
        Component {
            cid,
            pid,
            weight,
            form_key: key.to_string(),
            name: key.to_uppercase(),
            kind: ComponentType::Textfield,
            value: String::new(),
            required: false,
            extra: ComponentExtra::default(),
        }
    }

    #[test]
    fn preserves_length_and_sibling_order() {
        let components = vec![
            component(1, 0, 0, "a"),
            component(2, 0, 1, "b"),
            component(3, 0, 2, "c"),
        ];

        let (ordered, xref) = build(components);

        assert_eq!(ordered.len(), 3);
        assert_eq!(xref.len(), 3);
        let keys: Vec<_> = ordered.iter().map(TreeNode::form_key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert!(ordered.iter().all(|node| node.depth == 0));
    }

    #[test]
    fn emits_pre_order_with_ancestor_depths() {
        // root: group(1), d(5); group: a(2), inner(3); inner: b(4)
        let components = vec![
            component(1, 0, 0, "group"),
            component(5, 0, 1, "d"),
            component(2, 1, 0, "a"),
            component(3, 1, 1, "inner"),
            component(4, 3, 0, "b"),
        ];

        let (ordered, _) = build(components);

        let sequence: Vec<_> = ordered
            .iter()
            .map(|node| (node.component.cid, node.depth))
            .collect();
        assert_eq!(sequence, vec![(1, 0), (2, 1), (3, 1), (4, 2), (5, 0)]);
    }

    #[test]
    fn rewrites_nested_keys_for_a_flat_namespace() {
        // Two fieldsets both containing a child keyed "name".
        let components = vec![
            component(1, 0, 0, "left"),
            component(2, 0, 1, "right"),
            component(3, 1, 0, "name"),
            component(4, 2, 0, "name"),
        ];

        let (ordered, xref) = build(components);

        let keys: Vec<_> = ordered.iter().map(TreeNode::form_key).collect();
        assert_eq!(keys, vec!["left", "name_1", "right", "name_2"]);

        // Pairwise unique, and the xref carries the rewritten keys.
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
        assert_eq!(xref[&3], "name_1");
        assert_eq!(xref[&4], "name_2");
    }

    #[test]
    fn orphaned_parent_reference_is_rehomed_to_root() {
        let components = vec![
            component(1, 0, 0, "a"),
            component(2, 99, 0, "stray"),
        ];

        let (ordered, _) = build(components);

        assert_eq!(ordered.len(), 2);
        let stray = ordered.iter().find(|n| n.component.cid == 2).unwrap();
        assert_eq!(stray.depth, 0);
        // Re-homed to root, so no rewrite.
        assert_eq!(stray.form_key(), "stray");
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        // A 5000-deep chain; would overflow the call stack if traversal were
        // recursive.
        let mut components = vec![component(1, 0, 0, "level")];
        for cid in 2..=5000 {
            components.push(component(cid, cid - 1, 0, "level"));
        }

        let (ordered, _) = build(components);

        assert_eq!(ordered.len(), 5000);
        assert_eq!(ordered.last().unwrap().depth, 4999);
    }

    #[test]
    fn duplicate_component_ids_degrade_to_one_node() {
        let components = vec![
            component(1, 0, 0, "a"),
            component(1, 0, 1, "a_dup"),
            component(2, 0, 2, "b"),
        ];

        let (ordered, xref) = build(components);

        let keys: Vec<_> = ordered.iter().map(TreeNode::form_key).collect();
        assert_eq!(keys, vec!["a_dup", "b"]);
        assert_eq!(xref.len(), 2);
    }

    #[test]
    fn empty_input_builds_empty_tree() {
        let (ordered, xref) = build(Vec::new());
        assert!(ordered.is_empty());
        assert!(xref.is_empty());
    }
}
