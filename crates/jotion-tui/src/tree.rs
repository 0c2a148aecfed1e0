use std::collections::{HashMap, HashSet};

use jotion_shared::Document;
use uuid::Uuid;

/// Sidebar document tree. Each level is fetched on demand when its parent is
/// first expanded and kept until refreshed.
#[derive(Debug, Default)]
pub struct DocumentTree {
    levels: HashMap<Option<Uuid>, Vec<Document>>,
    expanded: HashSet<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreeRow<'a> {
    Document {
        document: &'a Document,
        level: usize,
        expanded: bool,
    },
    /// Placeholder under an expanded document that has no children.
    Empty { level: usize },
}

impl<'a> TreeRow<'a> {
    pub fn level(&self) -> usize {
        match self {
            TreeRow::Document { level, .. } | TreeRow::Empty { level } => *level,
        }
    }

    pub fn document(&self) -> Option<&'a Document> {
        match self {
            TreeRow::Document { document, .. } => Some(document),
            TreeRow::Empty { .. } => None,
        }
    }
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
        self.expanded.clear();
    }

    pub fn set_children(&mut self, parent: Option<Uuid>, documents: Vec<Document>) {
        self.levels.insert(parent, documents);
    }

    pub fn is_loaded(&self, parent: Option<Uuid>) -> bool {
        self.levels.contains_key(&parent)
    }

    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expand(&mut self, id: Uuid) {
        self.expanded.insert(id);
    }

    pub fn collapse(&mut self, id: Uuid) {
        self.expanded.remove(&id);
    }

    pub fn find(&self, id: Uuid) -> Option<&Document> {
        self.levels.values().flatten().find(|d| d.id == id)
    }

    /// Visible rows in display order: each level newest first, children
    /// directly below their expanded parent.
    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::new();
        self.push_level(None, 0, &mut rows);
        rows
    }

    fn push_level<'a>(&'a self, parent: Option<Uuid>, level: usize, rows: &mut Vec<TreeRow<'a>>) {
        let Some(documents) = self.levels.get(&parent) else {
            return;
        };

        for document in documents {
            let expanded = self.expanded.contains(&document.id);
            rows.push(TreeRow::Document {
                document,
                level,
                expanded,
            });

            if !expanded {
                continue;
            }

            match self.levels.get(&Some(document.id)) {
                Some(children) if children.is_empty() => {
                    rows.push(TreeRow::Empty { level: level + 1 })
                }
                Some(_) => self.push_level(Some(document.id), level + 1, rows),
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str, parent: Option<Uuid>) -> Document {
        Document::new("user_1", title, parent)
    }

    fn labels(tree: &DocumentTree) -> Vec<String> {
        tree.rows()
            .iter()
            .map(|row| match row {
                TreeRow::Document { document, level, .. } => {
                    format!("{}{}", "-".repeat(*level), document.title)
                }
                TreeRow::Empty { level } => format!("{}(empty)", "-".repeat(*level)),
            })
            .collect()
    }

    #[test]
    fn collapsed_children_are_hidden() {
        let alpha = doc("Alpha", None);
        let beta = doc("Beta", Some(alpha.id));
        let mut tree = DocumentTree::new();
        tree.set_children(None, vec![alpha.clone()]);
        tree.set_children(Some(alpha.id), vec![beta]);

        assert_eq!(labels(&tree), ["Alpha"]);

        tree.expand(alpha.id);
        assert_eq!(labels(&tree), ["Alpha", "-Beta"]);

        tree.collapse(alpha.id);
        assert_eq!(labels(&tree), ["Alpha"]);
    }

    #[test]
    fn expanded_leaf_shows_placeholder() {
        let alpha = doc("Alpha", None);
        let mut tree = DocumentTree::new();
        tree.set_children(None, vec![alpha.clone()]);
        tree.set_children(Some(alpha.id), Vec::new());

        tree.expand(alpha.id);
        assert_eq!(labels(&tree), ["Alpha", "-(empty)"]);
        assert!(tree.is_expanded(alpha.id));
        assert_eq!(tree.rows()[1], TreeRow::Empty { level: 1 });
    }

    #[test]
    fn expanded_but_unloaded_level_shows_nothing_yet() {
        let alpha = doc("Alpha", None);
        let mut tree = DocumentTree::new();
        tree.set_children(None, vec![alpha.clone()]);
        tree.expand(alpha.id);

        assert!(!tree.is_loaded(Some(alpha.id)));
        assert_eq!(labels(&tree), ["Alpha"]);
    }

    #[test]
    fn nested_levels_render_depth_first() {
        let a = doc("A", None);
        let b = doc("B", None);
        let a1 = doc("A1", Some(a.id));
        let a1x = doc("A1x", Some(a1.id));
        let mut tree = DocumentTree::new();
        tree.set_children(None, vec![a.clone(), b]);
        tree.set_children(Some(a.id), vec![a1.clone()]);
        tree.set_children(Some(a1.id), vec![a1x]);
        tree.expand(a.id);
        tree.expand(a1.id);

        assert_eq!(labels(&tree), ["A", "-A1", "--A1x", "B"]);
        assert_eq!(tree.find(a1.id).map(|d| d.title.as_str()), Some("A1"));
    }
}
