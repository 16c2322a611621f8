//! Navigation index: lookup key to root-first ancestor path.

use std::collections::HashMap;
use std::rc::Rc;

use crate::normalize::section_key;
use crate::types::{AncestorPath, StructuralNode, StructureKind};

/// Every addressable node of one title, keyed two ways: by stable identifier
/// and, for sections, by normalized citation number. Both keys live in one map;
/// a later node in document order wins a key collision.
#[derive(Debug, Default)]
pub struct NavigationIndex {
    /// Key to ancestor path.
    paths: HashMap<String, AncestorPath>,
}

impl NavigationIndex {
    /// Walk the tree in pre-order and record each node's path.
    pub fn build(root: &Rc<StructuralNode>) -> Self {
        let mut index = Self::default();
        index.visit(root, &[]);
        return index;
    }

    /// Record `node` under its keys, then descend.
    fn visit(&mut self, node: &Rc<StructuralNode>, parents: &[Rc<StructuralNode>]) {
        let mut path = parents.to_vec();
        path.push(Rc::clone(node));

        if !node.identifier.is_empty() {
            self.paths.insert(node.identifier.clone(), path.clone());
        }
        if node.kind == StructureKind::Section && !node.number.is_empty() {
            self.paths.insert(section_key(&node.number), path.clone());
        }
        for child in &node.children {
            self.visit(child, &path);
        }
    }

    /// Look up an already-normalized key or a verbatim identifier.
    pub fn get(&self, key: &str) -> Option<&AncestorPath> {
        return self.paths.get(key);
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        return self.paths.len();
    }

    /// Whether no node was addressable.
    pub fn is_empty(&self) -> bool {
        return self.paths.is_empty();
    }
}
