//! Builders for automata and networks.
//!
//! Every `put_*` call registers the states it names, so states may be
//! introduced in any order. Validation runs once, in `build()`, and a failed
//! build yields no instance at all.

use std::collections::HashSet;

use tracing::debug;

use crate::bfa::Bfa;
use crate::error::ModelError;
use crate::fa::Fa;
use crate::graph::{Graph, Named, NodeId};
use crate::link::Link;
use crate::network::Network;
use crate::state::State;
use crate::transition::{EventTransition, Transition};

/// Builder shared by finite and behavioral automata, generic over the edge type.
#[derive(Debug, Clone)]
pub struct AutomatonBuilder<E> {
  name: String,
  graph: Graph<State, E>,
  deferred: Option<ModelError>,
}

pub type FaBuilder = AutomatonBuilder<Transition>;
pub type BfaBuilder = AutomatonBuilder<EventTransition>;

impl<E> AutomatonBuilder<E> {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      graph: Graph::new(),
      deferred: None,
    }
  }

  fn ensure_state(&mut self, name: &str) -> NodeId {
    self.graph.ensure_node(State::new(name))
  }

  fn update_state(&mut self, name: &str, update: impl FnOnce(&mut State)) -> &mut Self {
    let id = self.ensure_state(name);
    if let Some(state) = self.graph.node_mut(id) {
      update(state);
    }
    self
  }

  pub fn put_state(&mut self, name: &str) -> &mut Self {
    self.ensure_state(name);
    self
  }

  pub fn put_initial_state(&mut self, name: &str) -> &mut Self {
    self.update_state(name, |state| state.set_initial(true))
  }

  /// Register an edge from `source` to `target`, registering both states.
  pub fn put_transition(&mut self, source: &str, target: &str, edge: E) -> &mut Self {
    let source = self.ensure_state(source);
    let target = self.ensure_state(target);
    if let Err(error) = self.graph.add_edge(source, target, edge) {
      self.deferred.get_or_insert(error);
    }
    self
  }

  fn check_deferred(&mut self) -> Result<(), ModelError> {
    match self.deferred.take() {
      Some(error) => Err(error),
      None => Ok(()),
    }
  }

  /// Exactly one state must be flagged initial.
  fn validate_initial(&self) -> Result<NodeId, ModelError> {
    let initial: Vec<NodeId> = self
      .graph
      .nodes()
      .filter(|(_, state)| state.is_initial())
      .map(|(id, _)| id)
      .collect();

    match initial.as_slice() {
      [] => Err(ModelError::InitialStateNotFound {
        automaton: self.name.clone(),
      }),
      [only] => Ok(*only),
      many => Err(ModelError::MultipleInitialStates {
        automaton: self.name.clone(),
        states: many
          .iter()
          .filter_map(|&id| self.graph.node(id))
          .map(|state| state.name().to_string())
          .collect(),
      }),
    }
  }

  /// No isolated state, unless the automaton has a single state.
  fn validate_connected(&self) -> Result<(), ModelError> {
    if self.graph.node_count() <= 1 {
      return Ok(());
    }
    match self.graph.isolated_nodes().next() {
      Some(id) => Err(ModelError::IsolatedState {
        automaton: self.name.clone(),
        state: self
          .graph
          .node(id)
          .map(|state| state.name().to_string())
          .unwrap_or_default(),
      }),
      None => Ok(()),
    }
  }
}

impl AutomatonBuilder<Transition> {
  pub fn put_final_state(&mut self, name: &str) -> &mut Self {
    self.update_state(name, |state| state.set_final(true))
  }

  pub fn put_acceptance_state(&mut self, name: &str) -> &mut Self {
    self.update_state(name, |state| state.set_acceptance(true))
  }

  pub fn build(mut self) -> Result<Fa, ModelError> {
    self.check_deferred()?;
    let initial = self.validate_initial()?;

    let has_final = self
      .graph
      .nodes()
      .any(|(_, state)| state.is_final() || state.is_acceptance());
    if !has_final {
      return Err(ModelError::NoFinalState {
        automaton: self.name,
      });
    }

    self.validate_connected()?;

    debug!(
      automaton = %self.name,
      states = self.graph.node_count(),
      transitions = self.graph.edge_count(),
      "finite automaton built"
    );
    Ok(Fa::from_parts(self.name, self.graph, initial))
  }
}

impl AutomatonBuilder<EventTransition> {
  pub fn build(mut self) -> Result<Bfa, ModelError> {
    self.check_deferred()?;
    let initial = self.validate_initial()?;
    self.validate_connected()?;

    let mut names = HashSet::new();
    for (_, _, _, transition) in self.graph.edges() {
      if !names.insert(transition.name()) {
        return Err(ModelError::DuplicateTransition {
          automaton: self.name.clone(),
          name: transition.name().to_string(),
        });
      }
    }

    debug!(
      automaton = %self.name,
      states = self.graph.node_count(),
      transitions = self.graph.edge_count(),
      "behavioral automaton built"
    );
    Ok(Bfa::from_parts(self.name, self.graph, initial))
  }
}

/// Builder for networks of behavioral automata.
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
  graph: Graph<Bfa, Link>,
  deferred: Option<ModelError>,
}

impl NetworkBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add an automaton. Its name must be unique within the network.
  pub fn put_automaton(&mut self, bfa: Bfa) -> &mut Self {
    if let Err(error) = self.graph.add_node(bfa) {
      self.deferred.get_or_insert(error);
    }
    self
  }

  /// Connect two automata, `source` writing and `target` reading.
  pub fn put_link(&mut self, source: &str, target: &str, link: Link) -> &mut Self {
    let endpoints = [source, target].map(|name| {
      self
        .graph
        .find_node(name)
        .ok_or_else(|| ModelError::AutomatonNotFound(name.to_string()))
    });
    let result = match endpoints {
      [Ok(source), Ok(target)] => self.graph.add_edge(source, target, link).map(|_| ()),
      [Err(error), _] | [_, Err(error)] => Err(error),
    };
    if let Err(error) = result {
      self.deferred.get_or_insert(error);
    }
    self
  }

  pub fn build(mut self) -> Result<Network, ModelError> {
    if let Some(error) = self.deferred.take() {
      return Err(error);
    }

    let mut names = HashSet::new();
    for (_, _, _, link) in self.graph.edges() {
      if !names.insert(link.name()) {
        return Err(ModelError::DuplicateLink {
          name: link.name().to_string(),
        });
      }
    }

    debug!(
      automata = self.graph.node_count(),
      links = self.graph.edge_count(),
      "network built"
    );
    Ok(Network::from_graph(self.graph))
  }
}
