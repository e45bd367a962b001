use crate::error::ConfigurationError;
use crate::path::Path;
use crate::rrt::neighbors::NearestNeighbors;
use crate::space::StateSpace;
use crate::state::State;
use crate::util::Real;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A node in the RRT tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "F: Real + Deserialize<'de>"))]
pub struct Node<F> {
    /// The configuration held by this node.
    state: State<F>,
    /// The index of the parent node (None if the node is the root).
    parent: Option<usize>,
    /// The index of this node in the tree.
    index: usize,
}

impl<F: Real> Node<F> {
    pub fn state(&self) -> &State<F> {
        &self.state
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// An append-only arena of nodes plus the nearest neighbor index over their states.
///
/// Nodes are never removed or reparented, so an index stays valid for the
/// lifetime of the tree.
pub struct Tree<F: Real, NN> {
    nodes: Vec<Node<F>>,
    nearest_neighbors: NN,
}

impl<F: Real, NN: NearestNeighbors<F>> Tree<F, NN> {
    /// Constructs a tree holding only the root.
    pub fn new(space: Arc<StateSpace<F>>, root: State<F>) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            nearest_neighbors: NN::new(space),
        };
        tree.push(root, None);
        tree
    }

    /// Adds `state` as a child of `parent` and returns the new node's index.
    ///
    /// Returns `None`, leaving the tree unchanged, if `parent` is not a node of this tree.
    pub fn add_node(&mut self, state: State<F>, parent: usize) -> Option<usize> {
        if parent >= self.nodes.len() {
            return None;
        }
        Some(self.push(state, Some(parent)))
    }

    fn push(&mut self, state: State<F>, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nearest_neighbors.add(state.clone(), index);
        self.nodes.push(Node {
            state,
            parent,
            index,
        });
        index
    }

    /// Index of the node closest to `state`.
    pub fn nearest(&self, state: &State<F>) -> Result<usize, ConfigurationError> {
        // the root is always present
        Ok(self.nearest_neighbors.nearest_one(state)?.unwrap_or(0))
    }

    pub fn node(&self, index: usize) -> Option<&Node<F>> {
        self.nodes.get(index)
    }

    pub fn root(&self) -> &Node<F> {
        &self.nodes[0]
    }

    pub fn nodes(&self) -> &[Node<F>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the path from the root to the node at `index`, or `None` if there is no such node.
    pub fn extract_path(&self, index: usize) -> Option<Path<F>> {
        let mut current = self.nodes.get(index)?;
        let mut states = vec![current.state.clone()];

        // Reconstruct the path by backtracking up the tree (following the parent pointers).
        while let Some(parent) = current.parent {
            current = &self.nodes[parent];
            states.push(current.state.clone());
        }

        // Reverse the path so that it goes from the start to the goal.
        states.reverse();
        Some(Path::new(states))
    }
}
