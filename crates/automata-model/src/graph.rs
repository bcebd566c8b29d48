use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::ModelError;

/// Anything addressable by a name that is unique within its graph.
pub trait Named {
  fn name(&self) -> &str;
}

/// Nodes whose name may be changed by their owning graph.
///
/// Rename through `Graph::rename_node` only; renaming a node obtained from
/// `node_mut` leaves the name index stale.
pub trait Rename: Named {
  fn rename(&mut self, name: String);
}

/// Stable handle to a node. Never reused after the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Stable handle to an edge. Never reused after the edge is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl NodeId {
  pub fn index(self) -> usize {
    self.0
  }
}

impl EdgeId {
  pub fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

impl fmt::Display for EdgeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

#[derive(Debug, Clone)]
struct NodeSlot<N> {
  weight: N,
  outgoing: BTreeSet<EdgeId>,
  incoming: BTreeSet<EdgeId>,
}

#[derive(Debug, Clone)]
struct EdgeSlot<E> {
  source: NodeId,
  target: NodeId,
  weight: E,
}

/// Directed multigraph with named nodes.
///
/// Nodes and edges live in arenas addressed by `NodeId`/`EdgeId`. Removal
/// frees a slot without shifting the others, so handles of surviving elements
/// stay valid and incidence sets stay cheap to update. Parallel edges and
/// self-loops are allowed. Iteration always follows handle order.
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
  nodes: Vec<Option<NodeSlot<N>>>,
  edges: Vec<Option<EdgeSlot<E>>>,
  names: HashMap<String, NodeId>,
  node_count: usize,
  edge_count: usize,
}

impl<N, E> Default for Graph<N, E> {
  fn default() -> Self {
    Self {
      nodes: Vec::new(),
      edges: Vec::new(),
      names: HashMap::new(),
      node_count: 0,
      edge_count: 0,
    }
  }
}

impl<N: Named, E> Graph<N, E> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a node. Fails if another node already uses its name.
  pub fn add_node(&mut self, node: N) -> Result<NodeId, ModelError> {
    if self.names.contains_key(node.name()) {
      return Err(ModelError::DuplicateName {
        name: node.name().to_string(),
      });
    }
    Ok(self.insert_node(node))
  }

  /// Return the node carrying `node`'s name, inserting `node` if there is none.
  pub fn ensure_node(&mut self, node: N) -> NodeId {
    match self.names.get(node.name()) {
      Some(&id) => id,
      None => self.insert_node(node),
    }
  }

  fn insert_node(&mut self, node: N) -> NodeId {
    let id = NodeId(self.nodes.len());
    self.names.insert(node.name().to_string(), id);
    self.nodes.push(Some(NodeSlot {
      weight: node,
      outgoing: BTreeSet::new(),
      incoming: BTreeSet::new(),
    }));
    self.node_count += 1;
    id
  }

  /// Remove a node together with every incident edge.
  pub fn remove_node(&mut self, id: NodeId) -> Option<N> {
    let incident: BTreeSet<EdgeId> = {
      let slot = self.slot(id)?;
      slot.outgoing.union(&slot.incoming).copied().collect()
    };
    for edge in incident {
      self.remove_edge(edge);
    }

    let slot = self.nodes.get_mut(id.0)?.take()?;
    self.names.remove(slot.weight.name());
    self.node_count -= 1;
    Some(slot.weight)
  }

  /// Look up a node by name.
  pub fn find_node(&self, name: &str) -> Option<NodeId> {
    self.names.get(name).copied()
  }

  /// Rename a node, keeping names unique.
  pub fn rename_node(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), ModelError>
  where
    N: Rename,
  {
    let name = name.into();
    match self.names.get(&name) {
      Some(&existing) if existing == id => return Ok(()),
      Some(_) => return Err(ModelError::DuplicateName { name }),
      None => {}
    }

    let slot = self
      .nodes
      .get_mut(id.0)
      .and_then(Option::as_mut)
      .ok_or(ModelError::UnknownNode(id))?;
    self.names.remove(slot.weight.name());
    slot.weight.rename(name.clone());
    self.names.insert(name, id);
    Ok(())
  }

  /// A name derived from `base` that no node uses yet.
  pub fn fresh_name(&self, base: &str) -> String {
    if !self.names.contains_key(base) {
      return base.to_string();
    }
    (1..)
      .map(|n| format!("{base}_{n}"))
      .find(|candidate| !self.names.contains_key(candidate))
      .unwrap_or_else(|| base.to_string())
  }

  /// Nodes and edges equal by name, independent of handle assignment.
  pub fn structurally_eq(&self, other: &Self) -> bool
  where
    N: PartialEq,
    E: PartialEq,
  {
    if self.node_count != other.node_count || self.edge_count != other.edge_count {
      return false;
    }

    let nodes_match = self.nodes().all(|(_, node)| {
      other
        .find_node(node.name())
        .and_then(|id| other.node(id))
        .is_some_and(|theirs| theirs == node)
    });
    if !nodes_match {
      return false;
    }

    let mut unmatched: Vec<(&str, &str, &E)> = other
      .edges()
      .map(|(_, source, target, edge)| (other.name_of(source), other.name_of(target), edge))
      .collect();
    for (_, source, target, edge) in self.edges() {
      let key = (self.name_of(source), self.name_of(target));
      match unmatched
        .iter()
        .position(|&(s, t, e)| (s, t) == key && e == edge)
      {
        Some(index) => {
          unmatched.swap_remove(index);
        }
        None => return false,
      }
    }
    unmatched.is_empty()
  }

  fn name_of(&self, id: NodeId) -> &str {
    self.node(id).map(Named::name).unwrap_or_default()
  }
}

impl<N, E> Graph<N, E> {
  fn slot(&self, id: NodeId) -> Option<&NodeSlot<N>> {
    self.nodes.get(id.0).and_then(Option::as_ref)
  }

  /// Insert an edge between two existing nodes.
  pub fn add_edge(&mut self, source: NodeId, target: NodeId, edge: E) -> Result<EdgeId, ModelError> {
    for node in [source, target] {
      if !self.contains_node(node) {
        return Err(ModelError::UnknownNode(node));
      }
    }

    let id = EdgeId(self.edges.len());
    self.edges.push(Some(EdgeSlot {
      source,
      target,
      weight: edge,
    }));
    if let Some(slot) = self.nodes[source.0].as_mut() {
      slot.outgoing.insert(id);
    }
    if let Some(slot) = self.nodes[target.0].as_mut() {
      slot.incoming.insert(id);
    }
    self.edge_count += 1;
    Ok(id)
  }

  pub fn remove_edge(&mut self, id: EdgeId) -> Option<E> {
    let slot = self.edges.get_mut(id.0)?.take()?;
    if let Some(source) = self.nodes.get_mut(slot.source.0).and_then(Option::as_mut) {
      source.outgoing.remove(&id);
    }
    if let Some(target) = self.nodes.get_mut(slot.target.0).and_then(Option::as_mut) {
      target.incoming.remove(&id);
    }
    self.edge_count -= 1;
    Some(slot.weight)
  }

  pub fn node(&self, id: NodeId) -> Option<&N> {
    self.slot(id).map(|slot| &slot.weight)
  }

  pub fn node_mut(&mut self, id: NodeId) -> Option<&mut N> {
    self
      .nodes
      .get_mut(id.0)
      .and_then(Option::as_mut)
      .map(|slot| &mut slot.weight)
  }

  pub fn edge(&self, id: EdgeId) -> Option<&E> {
    self.edge_slot(id).map(|slot| &slot.weight)
  }

  pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut E> {
    self
      .edges
      .get_mut(id.0)
      .and_then(Option::as_mut)
      .map(|slot| &mut slot.weight)
  }

  fn edge_slot(&self, id: EdgeId) -> Option<&EdgeSlot<E>> {
    self.edges.get(id.0).and_then(Option::as_ref)
  }

  /// Source and target of an edge.
  pub fn endpoints(&self, id: EdgeId) -> Option<(NodeId, NodeId)> {
    self.edge_slot(id).map(|slot| (slot.source, slot.target))
  }

  pub fn source(&self, id: EdgeId) -> Option<NodeId> {
    self.edge_slot(id).map(|slot| slot.source)
  }

  pub fn target(&self, id: EdgeId) -> Option<NodeId> {
    self.edge_slot(id).map(|slot| slot.target)
  }

  pub fn contains_node(&self, id: NodeId) -> bool {
    self.slot(id).is_some()
  }

  pub fn contains_edge(&self, id: EdgeId) -> bool {
    self.edge_slot(id).is_some()
  }

  /// Edges leaving `id`, self-loops included.
  pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
    self
      .slot(id)
      .into_iter()
      .flat_map(|slot| slot.outgoing.iter().copied())
  }

  /// Edges entering `id`, self-loops included.
  pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
    self
      .slot(id)
      .into_iter()
      .flat_map(|slot| slot.incoming.iter().copied())
  }

  pub fn out_degree(&self, id: NodeId) -> usize {
    self.slot(id).map_or(0, |slot| slot.outgoing.len())
  }

  pub fn in_degree(&self, id: NodeId) -> usize {
    self.slot(id).map_or(0, |slot| slot.incoming.len())
  }

  /// Distinct sources of the edges entering `id`.
  pub fn predecessors(&self, id: NodeId) -> BTreeSet<NodeId> {
    self
      .incoming(id)
      .filter_map(|edge| self.source(edge))
      .collect()
  }

  /// Distinct targets of the edges leaving `id`.
  pub fn successors(&self, id: NodeId) -> BTreeSet<NodeId> {
    self
      .outgoing(id)
      .filter_map(|edge| self.target(edge))
      .collect()
  }

  /// Every edge from `source` to `target`, in handle order.
  pub fn edges_between(&self, source: NodeId, target: NodeId) -> Vec<EdgeId> {
    self
      .outgoing(source)
      .filter(|&edge| self.target(edge) == Some(target))
      .collect()
  }

  pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
    self.nodes().map(|(id, _)| id)
  }

  pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
    self.edges().map(|(id, _, _, _)| id)
  }

  pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
    self
      .nodes
      .iter()
      .enumerate()
      .filter_map(|(index, slot)| slot.as_ref().map(|slot| (NodeId(index), &slot.weight)))
  }

  /// Edges as `(id, source, target, weight)`.
  pub fn edges(&self) -> impl Iterator<Item = (EdgeId, NodeId, NodeId, &E)> + '_ {
    self.edges.iter().enumerate().filter_map(|(index, slot)| {
      slot
        .as_ref()
        .map(|slot| (EdgeId(index), slot.source, slot.target, &slot.weight))
    })
  }

  /// Nodes with neither incoming nor outgoing edges.
  pub fn isolated_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
    self
      .node_ids()
      .filter(|&id| self.in_degree(id) == 0 && self.out_degree(id) == 0)
  }

  pub fn node_count(&self) -> usize {
    self.node_count
  }

  pub fn edge_count(&self) -> usize {
    self.edge_count
  }

  pub fn is_empty(&self) -> bool {
    self.node_count == 0
  }
}
