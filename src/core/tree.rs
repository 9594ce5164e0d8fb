//! Arena-backed tree of states.
//!
//! Nodes live in a `Vec` and refer to each other through [`NodeIndex`]
//! values, which stay valid for the lifetime of the tree because nodes are
//! never removed. Index 0 is always the root.

use super::handler::StateHandler;
use super::state::State;
use crate::builder::BuildError;
use std::collections::HashMap;
use std::fmt;

/// Stable position of a node inside its [`StateTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub const ROOT: NodeIndex = NodeIndex(0);

    pub fn get(self) -> usize {
        self.0
    }
}

struct StateNode<S: State, E> {
    id: S,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
    handler: Box<dyn StateHandler<S, E>>,
}

/// Ownership tree of state handlers.
///
/// Built once (root first, then children under existing parents) and never
/// restructured afterwards, so it is acyclic and single-rooted by
/// construction.
pub struct StateTree<S: State, E> {
    nodes: Vec<StateNode<S, E>>,
    index: HashMap<S, NodeIndex>,
}

impl<S: State, E> StateTree<S, E> {
    /// Create a tree containing only the root state.
    pub fn new(root: S, handler: impl StateHandler<S, E> + 'static) -> Self {
        let mut index = HashMap::new();
        index.insert(root, NodeIndex::ROOT);
        Self {
            nodes: vec![StateNode {
                id: root,
                parent: None,
                children: Vec::new(),
                handler: Box::new(handler),
            }],
            index,
        }
    }

    /// Append `id` as a child of `parent`.
    pub fn append_child(
        &mut self,
        parent: S,
        id: S,
        handler: impl StateHandler<S, E> + 'static,
    ) -> Result<NodeIndex, BuildError> {
        self.append_boxed(parent, id, Box::new(handler))
    }

    pub(crate) fn append_boxed(
        &mut self,
        parent: S,
        id: S,
        handler: Box<dyn StateHandler<S, E>>,
    ) -> Result<NodeIndex, BuildError> {
        let parent_index = self
            .index_of(parent)
            .ok_or_else(|| BuildError::UnknownParent {
                parent: format!("{parent:?}"),
                child: format!("{id:?}"),
            })?;
        if self.index.contains_key(&id) {
            return Err(BuildError::DuplicateState(format!("{id:?}")));
        }

        let node = NodeIndex(self.nodes.len());
        self.nodes.push(StateNode {
            id,
            parent: Some(parent_index),
            children: Vec::new(),
            handler,
        });
        self.nodes[parent_index.0].children.push(node);
        self.index.insert(id, node);
        Ok(node)
    }

    pub fn root(&self) -> NodeIndex {
        NodeIndex::ROOT
    }

    pub fn root_state(&self) -> S {
        self.nodes[0].id
    }

    pub fn index_of(&self, id: S) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: S) -> bool {
        self.index.contains_key(&id)
    }

    /// Identifier stored at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` was not produced by this tree.
    pub fn state(&self, node: NodeIndex) -> S {
        self.nodes[node.0].id
    }

    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.nodes[node.0].children
    }

    /// `node` and its ancestors, leaf first, stopping before the root.
    pub fn path_to_root(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut path = Vec::new();
        let mut cursor = node;
        while cursor != NodeIndex::ROOT {
            path.push(cursor);
            match self.parent(cursor) {
                Some(parent) => cursor = parent,
                None => break,
            }
        }
        path
    }

    /// Number of edges between `node` and the root.
    pub fn depth(&self, node: NodeIndex) -> usize {
        self.path_to_root(node).len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All state identifiers in insertion order, root first.
    pub fn states(&self) -> impl Iterator<Item = S> + '_ {
        self.nodes.iter().map(|node| node.id)
    }

    pub(crate) fn handler_mut(&mut self, node: NodeIndex) -> &mut dyn StateHandler<S, E> {
        self.nodes[node.0].handler.as_mut()
    }
}

impl<S: State, E> fmt::Debug for StateTree<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.nodes
                    .iter()
                    .map(|node| (node.id, node.parent.map(|p| self.nodes[p.0].id))),
            )
            .finish()
    }
}
