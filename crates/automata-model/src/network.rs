use crate::bfa::Bfa;
use crate::builder::NetworkBuilder;
use crate::error::ModelError;
use crate::graph::{EdgeId, Graph, Named, NodeId};
use crate::link::Link;

/// Behavioral automata connected by single-slot links.
///
/// The network owns its automata and links. Link contents change only through
/// `fill_link`/`clear_link`, and cursors only through `bfa_mut`, so a
/// `&mut Network` borrow is the single writer of the whole global state.
#[derive(Debug, Clone)]
pub struct Network {
  graph: Graph<Bfa, Link>,
}

impl Network {
  pub fn builder() -> NetworkBuilder {
    NetworkBuilder::new()
  }

  pub(crate) fn from_graph(graph: Graph<Bfa, Link>) -> Self {
    Self { graph }
  }

  pub fn graph(&self) -> &Graph<Bfa, Link> {
    &self.graph
  }

  /// Look up an automaton by name.
  pub fn automaton(&self, name: &str) -> Option<NodeId> {
    self.graph.find_node(name)
  }

  pub fn bfa(&self, id: NodeId) -> Option<&Bfa> {
    self.graph.node(id)
  }

  pub fn bfa_mut(&mut self, id: NodeId) -> Option<&mut Bfa> {
    self.graph.node_mut(id)
  }

  pub fn automata(&self) -> impl Iterator<Item = (NodeId, &Bfa)> + '_ {
    self.graph.nodes()
  }

  /// Look up a link by name.
  pub fn link(&self, name: &str) -> Option<EdgeId> {
    self
      .graph
      .edges()
      .find(|(_, _, _, link)| link.name() == name)
      .map(|(id, _, _, _)| id)
  }

  pub fn link_at(&self, id: EdgeId) -> Option<&Link> {
    self.graph.edge(id)
  }

  /// Links as `(id, source automaton, target automaton, link)`.
  pub fn links(&self) -> impl Iterator<Item = (EdgeId, NodeId, NodeId, &Link)> + '_ {
    self.graph.edges()
  }

  /// Links the automaton reads from.
  pub fn incoming_links(&self, bfa: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
    self.graph.incoming(bfa)
  }

  /// Links the automaton writes to.
  pub fn outgoing_links(&self, bfa: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
    self.graph.outgoing(bfa)
  }

  /// Place an event into an empty link.
  pub fn fill_link(&mut self, link: EdgeId, event: impl Into<String>) -> Result<(), ModelError> {
    self
      .graph
      .edge_mut(link)
      .ok_or(ModelError::UnknownEdge(link))?
      .fill(event)
  }

  /// Empty a link, returning the event it held.
  pub fn clear_link(&mut self, link: EdgeId) -> Option<String> {
    self.graph.edge_mut(link).and_then(Link::take)
  }

  /// Return every automaton to its initial state and empty every link.
  pub fn reset(&mut self) {
    let automata: Vec<NodeId> = self.graph.node_ids().collect();
    for id in automata {
      if let Some(bfa) = self.graph.node_mut(id) {
        bfa.reset();
      }
    }
    let links: Vec<EdgeId> = self.graph.edge_ids().collect();
    for id in links {
      self.clear_link(id);
    }
  }
}

impl PartialEq for Network {
  fn eq(&self, other: &Self) -> bool {
    self.graph.structurally_eq(&other.graph)
  }
}
