//! Tree expansion state and the visible row walk.
//!
//! Levels are 1-based. At level `L` every directory whose depth (0 for the
//! root's direct children) is at least `L - 1` is collapsed, so rows of
//! depth `0..L` are visible. Level 1 shows only the top level; the maximum
//! level shows the whole snapshot.

use std::collections::HashSet;

use workbench_core::types::TreeNode;

/// Which directories are collapsed, plus the level used for stepping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionState {
    /// Directory paths whose children are hidden. Stale paths are ignored.
    pub collapsed_dirs: HashSet<String>,
    /// Current expand level, always at least 1.
    pub expand_level: usize,
}

impl Default for ExpansionState {
    fn default() -> Self {
        Self {
            collapsed_dirs: HashSet::new(),
            expand_level: 1,
        }
    }
}

/// One row of the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow<'a> {
    /// The node on this row.
    pub node: &'a TreeNode,
    /// Nesting depth, 0 for the root's direct children.
    pub depth: usize,
}

/// Lazy pre-order walk over a snapshot.
///
/// Descends into a directory only when its path is not collapsed. A walk
/// without a collapsed set visits every node.
#[derive(Debug, Clone)]
pub struct VisibleRows<'a> {
    stack: Vec<(&'a TreeNode, usize)>,
    collapsed: Option<&'a HashSet<String>>,
}

impl<'a> VisibleRows<'a> {
    fn new(nodes: &'a [TreeNode], collapsed: Option<&'a HashSet<String>>) -> Self {
        Self {
            stack: nodes.iter().rev().map(|node| (node, 0)).collect(),
            collapsed,
        }
    }
}

impl<'a> Iterator for VisibleRows<'a> {
    type Item = VisibleRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;

        if let TreeNode::Directory { path, children, .. } = node {
            let expanded = self.collapsed.is_none_or(|set| !set.contains(path));
            if expanded {
                self.stack
                    .extend(children.iter().rev().map(|child| (child, depth + 1)));
            }
        }

        Some(VisibleRow { node, depth })
    }
}

/// Owns the latest snapshot, its expansion state and the selected file.
#[derive(Debug, Clone, Default)]
pub struct TreeStateMachine {
    snapshot: Vec<TreeNode>,
    expansion: ExpansionState,
    selected_file: Option<String>,
}

impl TreeStateMachine {
    /// An empty machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot and collapse every directory in it.
    pub fn load(&mut self, snapshot: Vec<TreeNode>) {
        self.snapshot = snapshot;
        self.collapse_all();
    }

    /// Flip one directory between collapsed and expanded.
    ///
    /// The expand level is recomputed from the directories that are
    /// actually reachable through expanded ancestors.
    pub fn toggle(&mut self, dir_path: &str) {
        if !self.expansion.collapsed_dirs.remove(dir_path) {
            self.expansion.collapsed_dirs.insert(dir_path.to_string());
        }
        self.expansion.expand_level = self.expanded_frontier_level();
    }

    /// Show one more level, wrapping back to level 1 after the deepest.
    pub fn expand_next_level(&mut self) {
        let level = self.expansion.expand_level;
        let next = if level >= self.max_depth() { 1 } else { level + 1 };
        self.apply_level(next);
    }

    /// Hide one level, never going below level 1.
    pub fn collapse_next_level(&mut self) {
        let next = self.expansion.expand_level.saturating_sub(1).max(1);
        self.apply_level(next);
    }

    /// Expand every directory.
    pub fn expand_all(&mut self) {
        self.expansion.collapsed_dirs.clear();
        self.expansion.expand_level = self.max_depth();
    }

    /// Collapse every directory.
    pub fn collapse_all(&mut self) {
        self.expansion.collapsed_dirs = self.directory_paths().map(str::to_string).collect();
        self.expansion.expand_level = 1;
    }

    /// Rows currently visible, walked fresh from the snapshot.
    pub fn visible_rows(&self) -> VisibleRows<'_> {
        VisibleRows::new(&self.snapshot, Some(&self.expansion.collapsed_dirs))
    }

    /// Number of levels in the snapshot: 1 plus the deepest node depth.
    pub fn max_depth(&self) -> usize {
        VisibleRows::new(&self.snapshot, None)
            .map(|row| row.depth + 1)
            .max()
            .unwrap_or(1)
    }

    /// Whether a directory is collapsed.
    pub fn is_collapsed(&self, dir_path: &str) -> bool {
        self.expansion.collapsed_dirs.contains(dir_path)
    }

    /// Mark a file as selected.
    pub fn select(&mut self, path: impl Into<String>) {
        self.selected_file = Some(path.into());
    }

    /// Clear the file selection.
    pub fn clear_selection(&mut self) {
        self.selected_file = None;
    }

    /// Selected file path, if any.
    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> &[TreeNode] {
        &self.snapshot
    }

    /// The current expansion state.
    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Every directory path in the snapshot, in pre-order.
    pub fn directory_paths(&self) -> impl Iterator<Item = &str> {
        VisibleRows::new(&self.snapshot, None)
            .filter(|row| row.node.is_dir())
            .map(|row| row.node.path())
    }

    fn apply_level(&mut self, level: usize) {
        let collapsed = VisibleRows::new(&self.snapshot, None)
            .filter(|row| row.node.is_dir() && row.depth + 1 >= level)
            .map(|row| row.node.path().to_string())
            .collect();

        self.expansion = ExpansionState {
            collapsed_dirs: collapsed,
            expand_level: level,
        };
    }

    fn expanded_frontier_level(&self) -> usize {
        self.visible_rows()
            .filter(|row| row.node.is_dir() && !self.is_collapsed(row.node.path()))
            .map(|row| row.depth + 2)
            .max()
            .unwrap_or(1)
    }
}
