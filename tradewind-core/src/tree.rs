//! Arena of routing points addressed by [`PointId`].
//!
//! Every router owns one `PathTree`. Nodes refer to their predecessor by
//! index, so many paths can share a common prefix without reference
//! counting, and the whole search structure is freed with the router.

use crate::{PointId, RoutingPoint};

/// One layer of the search structure: an isochrone or a mesh rank.
pub type Isochrone = Vec<PointId>;

/// Append-only storage for the nodes created by a search.
///
/// # Examples
/// ```
/// use geo::Point;
/// use tradewind_core::{PathTree, RoutingPoint};
///
/// let mut tree = PathTree::new();
/// let root = tree.push(RoutingPoint::root(Point::new(0.0, 0.0), 90.0, 0.0));
/// let mut next = RoutingPoint::root(Point::new(1.0, 0.0), 90.0, 10.0);
/// next.previous_point = Some(root);
/// let leaf = tree.push(next);
///
/// let path = tree.path(leaf);
/// assert_eq!(path.len(), 2);
/// assert_eq!(path[0].time, 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathTree {
    nodes: Vec<RoutingPoint>,
}

impl PathTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node and return its id.
    pub fn push(&mut self, point: RoutingPoint) -> PointId {
        let id = PointId(self.nodes.len());
        self.nodes.push(point);
        id
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: PointId) -> Option<&RoutingPoint> {
        self.nodes.get(id.0)
    }

    /// Mutable access for in-place relaxation.
    pub fn get_mut(&mut self, id: PointId) -> Option<&mut RoutingPoint> {
        self.nodes.get_mut(id.0)
    }

    /// Number of stored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node, keeping the allocation.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Walk from `id` back to the root, `id` first.
    pub fn ancestors(&self, id: PointId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id),
        }
    }

    /// Walk from `point` back to the root, `point` first.
    ///
    /// Useful when only a copy of the terminal node is at hand.
    pub fn ancestors_of<'a>(&'a self, point: &'a RoutingPoint) -> Ancestors<'a> {
        Ancestors {
            tree: self,
            next: Some(point),
        }
    }

    /// The path from the root to `id`, in travel order.
    #[must_use]
    pub fn path(&self, id: PointId) -> Vec<RoutingPoint> {
        let mut path: Vec<RoutingPoint> = self.ancestors(id).copied().collect();
        path.reverse();
        path
    }

    /// The path from the root to `point`, in travel order.
    #[must_use]
    pub fn path_to(&self, point: &RoutingPoint) -> Vec<RoutingPoint> {
        let mut path: Vec<RoutingPoint> = self.ancestors_of(point).copied().collect();
        path.reverse();
        path
    }

    /// Resolve a layer of ids into node copies, skipping unknown ids.
    #[must_use]
    pub fn resolve(&self, layer: &[PointId]) -> Vec<RoutingPoint> {
        layer.iter().filter_map(|id| self.get(*id)).copied().collect()
    }
}

/// Iterator over a node and its predecessors.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    tree: &'a PathTree,
    next: Option<&'a RoutingPoint>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a RoutingPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.previous_point.and_then(|id| self.tree.get(id));
        Some(current)
    }
}
