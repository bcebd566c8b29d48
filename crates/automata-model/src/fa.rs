use crate::builder::FaBuilder;
use crate::graph::{Graph, Named, NodeId};
use crate::state::State;
use crate::transition::Transition;

/// A validated finite automaton.
///
/// Built through [`FaBuilder`]; the graph is read-only afterwards.
#[derive(Debug, Clone)]
pub struct Fa {
  name: String,
  graph: Graph<State, Transition>,
  initial: NodeId,
}

impl Fa {
  pub fn builder(name: impl Into<String>) -> FaBuilder {
    FaBuilder::new(name)
  }

  pub(crate) fn from_parts(name: String, graph: Graph<State, Transition>, initial: NodeId) -> Self {
    Self {
      name,
      graph,
      initial,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn graph(&self) -> &Graph<State, Transition> {
    &self.graph
  }

  pub fn initial_state_id(&self) -> NodeId {
    self.initial
  }

  pub fn initial_state(&self) -> Option<&State> {
    self.graph.node(self.initial)
  }

  /// Look up a state by name.
  pub fn state(&self, name: &str) -> Option<NodeId> {
    self.graph.find_node(name)
  }

  pub fn final_states(&self) -> impl Iterator<Item = NodeId> + '_ {
    self
      .graph
      .nodes()
      .filter(|(_, state)| state.is_final())
      .map(|(id, _)| id)
  }

  pub fn acceptance_states(&self) -> impl Iterator<Item = NodeId> + '_ {
    self
      .graph
      .nodes()
      .filter(|(_, state)| state.is_acceptance())
      .map(|(id, _)| id)
  }
}

impl Named for Fa {
  fn name(&self) -> &str {
    &self.name
  }
}

impl PartialEq for Fa {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name && self.graph.structurally_eq(&other.graph)
  }
}
