use crate::builder::BfaBuilder;
use crate::error::ModelError;
use crate::graph::{EdgeId, Graph, Named, NodeId, Rename};
use crate::state::State;
use crate::transition::EventTransition;

/// A validated behavioral automaton with a simulation cursor.
#[derive(Debug, Clone)]
pub struct Bfa {
  name: String,
  graph: Graph<State, EventTransition>,
  initial: NodeId,
  current: NodeId,
}

impl Bfa {
  pub fn builder(name: impl Into<String>) -> BfaBuilder {
    BfaBuilder::new(name)
  }

  pub(crate) fn from_parts(
    name: String,
    graph: Graph<State, EventTransition>,
    initial: NodeId,
  ) -> Self {
    Self {
      name,
      graph,
      initial,
      current: initial,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn graph(&self) -> &Graph<State, EventTransition> {
    &self.graph
  }

  pub fn initial_state_id(&self) -> NodeId {
    self.initial
  }

  pub fn initial_state(&self) -> Option<&State> {
    self.graph.node(self.initial)
  }

  pub fn current_state_id(&self) -> NodeId {
    self.current
  }

  pub fn current_state(&self) -> Option<&State> {
    self.graph.node(self.current)
  }

  pub fn state(&self, name: &str) -> Option<NodeId> {
    self.graph.find_node(name)
  }

  /// Look up a transition by name.
  pub fn transition(&self, name: &str) -> Option<EdgeId> {
    self
      .graph
      .edges()
      .find(|(_, _, _, transition)| transition.name() == name)
      .map(|(id, _, _, _)| id)
  }

  /// Transitions leaving the current state.
  pub fn transitions_from_current(&self) -> impl Iterator<Item = (EdgeId, &EventTransition)> + '_ {
    self
      .graph
      .outgoing(self.current)
      .filter_map(|id| self.graph.edge(id).map(|transition| (id, transition)))
  }

  /// Move the cursor to an arbitrary state, e.g. when restoring a snapshot.
  pub fn set_current_state(&mut self, state: NodeId) -> Result<(), ModelError> {
    if !self.graph.contains_node(state) {
      return Err(ModelError::UnknownNode(state));
    }
    self.current = state;
    Ok(())
  }

  /// Move the cursor along `transition`, which must leave the current state.
  /// Returns the new current state.
  pub fn advance(&mut self, transition: EdgeId) -> Result<NodeId, ModelError> {
    let (source, target) = self
      .graph
      .endpoints(transition)
      .ok_or(ModelError::UnknownEdge(transition))?;
    if source != self.current {
      return Err(ModelError::NotFromCurrentState {
        transition: self
          .graph
          .edge(transition)
          .map(|t| t.name().to_string())
          .unwrap_or_default(),
        state: self
          .current_state()
          .map(|s| s.name().to_string())
          .unwrap_or_default(),
      });
    }
    self.current = target;
    Ok(target)
  }

  /// Return the cursor to the initial state.
  pub fn reset(&mut self) {
    self.current = self.initial;
  }
}

impl Named for Bfa {
  fn name(&self) -> &str {
    &self.name
  }
}

impl Rename for Bfa {
  fn rename(&mut self, name: String) {
    self.name = name;
  }
}

impl PartialEq for Bfa {
  fn eq(&self, other: &Self) -> bool {
    let current = self.current_state().map(Named::name);
    let other_current = other.current_state().map(Named::name);
    self.name == other.name
      && current == other_current
      && self.graph.structurally_eq(&other.graph)
  }
}
