//! Diffing of resolved view trees.
//!
//! Views are matched by [`ElementPath`] within each sibling list. A match of
//! the same [`ViewKind`] keeps the native view; anything else replaces it.

use std::collections::{HashMap, HashSet};

use crate::identity::ElementPath;
use crate::layout::LayoutAttributes;
use crate::view::{NativeViewNode, ViewKind};

/// One change the host must apply to its native view hierarchy.
///
/// Paths are absolute from the resolve root. `index` is the position among
/// the new siblings.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Insert {
        path: ElementPath,
        index: usize,
        kind: ViewKind,
        attributes: LayoutAttributes,
    },
    /// Reuse the existing view and apply new attributes.
    Update {
        path: ElementPath,
        index: usize,
        attributes: LayoutAttributes,
    },
    /// The view kind changed; the old subtree goes, a new view takes its place.
    Replace {
        path: ElementPath,
        index: usize,
        kind: ViewKind,
        attributes: LayoutAttributes,
    },
    Remove {
        path: ElementPath,
    },
}

impl ViewUpdate {
    pub fn path(&self) -> &ElementPath {
        match self {
            ViewUpdate::Insert { path, .. }
            | ViewUpdate::Update { path, .. }
            | ViewUpdate::Replace { path, .. }
            | ViewUpdate::Remove { path } => path,
        }
    }
}

/// Updates turning `previous` into `next`.
///
/// Within each sibling list, removals come first, then one entry per new
/// sibling in order, each followed by the updates for its own children.
pub fn reconcile(
    previous: &[(ElementPath, NativeViewNode)],
    next: &[(ElementPath, NativeViewNode)],
) -> Vec<ViewUpdate> {
    let mut updates = Vec::new();
    reconcile_siblings(&ElementPath::empty(), previous, next, &mut updates);
    updates
}

fn reconcile_siblings(
    base: &ElementPath,
    previous: &[(ElementPath, NativeViewNode)],
    next: &[(ElementPath, NativeViewNode)],
    updates: &mut Vec<ViewUpdate>,
) {
    let next_paths: HashSet<&ElementPath> = next.iter().map(|(path, _)| path).collect();
    for (path, _) in previous {
        if !next_paths.contains(path) {
            updates.push(ViewUpdate::Remove { path: base.joined(path) });
        }
    }

    let existing: HashMap<&ElementPath, &NativeViewNode> = previous.iter().map(|(path, node)| (path, node)).collect();
    for (index, (relative, node)) in next.iter().enumerate() {
        let path = base.joined(relative);
        let kind = node.view_description.kind();
        let attributes = node.layout_attributes;

        match existing.get(relative) {
            Some(old) if old.view_description.kind() == kind => {
                updates.push(ViewUpdate::Update {
                    path: path.clone(),
                    index,
                    attributes,
                });
                reconcile_siblings(&path, &old.children, &node.children, updates);
            }
            Some(_) => {
                updates.push(ViewUpdate::Replace {
                    path: path.clone(),
                    index,
                    kind,
                    attributes,
                });
                reconcile_siblings(&path, &[], &node.children, updates);
            }
            None => {
                updates.push(ViewUpdate::Insert {
                    path: path.clone(),
                    index,
                    kind,
                    attributes,
                });
                reconcile_siblings(&path, &[], &node.children, updates);
            }
        }
    }
}
