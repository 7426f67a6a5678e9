//! Per-frame control tree.

use std::collections::HashMap;

use super::{Control, ControlKind};
use crate::error::{UiError, UiResult};
use crate::id::ControlId;

/// Arena of this frame's controls, in declaration (paint) order.
///
/// Index 0 is always the window root. The tree is cleared at the start of
/// every frame and rebuilt from declarations.
#[derive(Debug)]
pub struct ControlTree {
    nodes: Vec<Control>,
    /// Indices of open containers, innermost last. The root is never popped.
    open: Vec<usize>,
    by_id: HashMap<ControlId, usize>,
    /// Focusable controls in declaration order.
    tab_order: Vec<ControlId>,
    /// Arena for control labels.
    text: String,
}

impl ControlTree {
    /// Creates a tree holding only a root.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(256),
            open: Vec::with_capacity(16),
            by_id: HashMap::with_capacity(256),
            tab_order: Vec::with_capacity(32),
            text: String::with_capacity(1024),
        };
        tree.clear();
        tree
    }

    /// Drops every control and starts over with a fresh root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.by_id.clear();
        self.tab_order.clear();
        self.text.clear();

        let root = Control::new(ControlId::ROOT, ControlKind::Root);
        self.by_id.insert(root.id, 0);
        self.nodes.push(root);
        self.open.push(0);
    }

    /// Number of controls, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Every control in paint order.
    #[must_use]
    pub fn nodes(&self) -> &[Control] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Control] {
        &mut self.nodes
    }

    /// Control at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Control> {
        self.nodes.get(index)
    }

    /// The window root.
    #[must_use]
    pub fn root(&self) -> &Control {
        &self.nodes[0]
    }

    /// Index of the control with `id`.
    #[must_use]
    pub fn index_of(&self, id: ControlId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// Control with `id`.
    #[must_use]
    pub fn find(&self, id: ControlId) -> Option<&Control> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Returns true if `id` was declared this frame.
    #[must_use]
    pub fn contains(&self, id: ControlId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Focusable controls in declaration order.
    #[must_use]
    pub fn tab_order(&self) -> &[ControlId] {
        &self.tab_order
    }

    /// Label text of a control.
    #[must_use]
    pub fn label(&self, control: &Control) -> &str {
        self.text.get(control.label.clone()).unwrap_or("")
    }

    /// Copies `text` into the label arena and returns its range.
    pub fn intern(&mut self, text: &str) -> std::ops::Range<usize> {
        let start = self.text.len();
        self.text.push_str(text);
        start..self.text.len()
    }

    /// Index of the innermost open container.
    #[must_use]
    pub fn current_parent(&self) -> usize {
        self.open.last().copied().unwrap_or(0)
    }

    /// Number of open containers, the root excluded.
    #[must_use]
    pub fn open_depth(&self) -> usize {
        self.open.len().saturating_sub(1)
    }

    /// Appends `control` as the last child of the innermost open container.
    ///
    /// Returns the new index, plus `DuplicateId` if another control already
    /// claimed the id this frame. The duplicate is still laid out and painted;
    /// lookups by id resolve to the first claimant.
    pub fn push(&mut self, mut control: Control) -> (usize, Option<UiError>) {
        let index = self.nodes.len();
        let parent = self.current_parent();

        control.parent = Some(parent);
        control.first_child = None;
        control.last_child = None;
        control.next_sibling = None;
        control.child_count = 0;
        control.subtree_end = index + 1;

        if let Some(prev) = self.nodes[parent].last_child {
            self.nodes[prev].next_sibling = Some(index);
        } else {
            self.nodes[parent].first_child = Some(index);
        }
        self.nodes[parent].last_child = Some(index);
        self.nodes[parent].child_count += 1;

        let id = control.id;
        if control.is_focusable() {
            self.tab_order.push(id);
        }
        self.nodes.push(control);

        match self.by_id.entry(id) {
            std::collections::hash_map::Entry::Occupied(_) => {
                (index, Some(UiError::DuplicateId(id.raw())))
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(index);
                (index, None)
            }
        }
    }

    /// Makes the container at `index` the parent of subsequent pushes.
    pub fn open(&mut self, index: usize) {
        self.open.push(index);
    }

    /// Closes the innermost open container, which must be of `kind`.
    ///
    /// # Errors
    ///
    /// `UnmatchedEnd` when nothing is open, `ContainerMismatch` when the
    /// innermost container is of another kind. The tree is unchanged.
    pub fn close(&mut self, kind: ControlKind) -> UiResult<usize> {
        let Some(index) = self.open.last().copied().filter(|&i| i != 0) else {
            return Err(UiError::UnmatchedEnd(kind));
        };
        let expected = self.nodes[index].kind;
        if expected != kind {
            return Err(UiError::ContainerMismatch {
                expected,
                found: kind,
            });
        }
        self.close_top();
        Ok(index)
    }

    /// Repair for a mismatched end: closes containers up to and including the
    /// innermost one of `kind`. Does nothing if none is open.
    pub fn close_through(&mut self, kind: ControlKind) -> Option<usize> {
        let depth = self
            .open
            .iter()
            .rposition(|&i| i != 0 && self.nodes[i].kind == kind)?;
        let target = self.open[depth];
        while self.open.len() > depth {
            self.close_top();
        }
        Some(target)
    }

    /// Closes the `count` innermost open containers, never the root.
    pub fn close_innermost(&mut self, count: usize) {
        for _ in 0..count.min(self.open_depth()) {
            self.close_top();
        }
    }

    /// Force-closes every open container. Returns how many were open.
    pub fn close_all(&mut self) -> usize {
        let count = self.open_depth();
        for _ in 0..count {
            self.close_top();
        }
        count
    }

    fn close_top(&mut self) {
        if self.open.len() <= 1 {
            return;
        }
        if let Some(index) = self.open.pop() {
            self.nodes[index].subtree_end = self.nodes.len();
        }
    }

    /// Seals the tree after the last declaration.
    pub fn finish(&mut self) {
        self.close_all();
        let end = self.nodes.len();
        self.nodes[0].subtree_end = end;
    }

    /// Direct children of the control at `index`, in declaration order.
    pub fn children(&self, index: usize) -> Children<'_> {
        Children {
            tree: self,
            next: self.nodes.get(index).and_then(|c| c.first_child),
        }
    }

    /// Controls in reverse paint order (for hit testing).
    pub fn iter_reverse(&self) -> impl Iterator<Item = (usize, &Control)> + '_ {
        self.nodes.iter().enumerate().rev()
    }
}

impl Default for ControlTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the direct children of a control.
pub struct Children<'a> {
    tree: &'a ControlTree,
    next: Option<usize>,
}

impl Iterator for Children<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        self.next = self.tree.nodes[index].next_sibling;
        Some(index)
    }
}
