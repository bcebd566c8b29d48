use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// Coarse classification shared by every error in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// A structural invariant was violated while building an instance.
  Validation,
  /// A required unique element is absent.
  NotFound,
  /// An operation was invoked outside its precondition.
  Precondition,
  /// Several elements satisfy a constraint expecting exactly one.
  Ambiguity,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
  #[error("duplicate name: {name}")]
  DuplicateName { name: String },

  #[error("automaton '{automaton}' has no initial state")]
  InitialStateNotFound { automaton: String },

  #[error("automaton '{automaton}' has multiple initial states: {}", states.join(", "))]
  MultipleInitialStates {
    automaton: String,
    states: Vec<String>,
  },

  #[error("automaton '{automaton}' has no final or acceptance state")]
  NoFinalState { automaton: String },

  #[error("state '{state}' of automaton '{automaton}' is isolated")]
  IsolatedState { automaton: String, state: String },

  #[error("automaton '{automaton}' has duplicate transition name: {name}")]
  DuplicateTransition { automaton: String, name: String },

  #[error("duplicate link name: {name}")]
  DuplicateLink { name: String },

  #[error("automaton not found: {0}")]
  AutomatonNotFound(String),

  #[error("node {0} does not exist")]
  UnknownNode(NodeId),

  #[error("edge {0} does not exist")]
  UnknownEdge(EdgeId),

  #[error("link '{link}' already holds event '{event}'")]
  LinkOccupied { link: String, event: String },

  #[error("transition '{transition}' does not leave current state '{state}'")]
  NotFromCurrentState { transition: String, state: String },
}

impl ModelError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      ModelError::InitialStateNotFound { .. }
      | ModelError::AutomatonNotFound(_)
      | ModelError::UnknownNode(_)
      | ModelError::UnknownEdge(_) => ErrorKind::NotFound,
      ModelError::MultipleInitialStates { .. } => ErrorKind::Ambiguity,
      ModelError::NoFinalState { .. }
      | ModelError::IsolatedState { .. }
      | ModelError::DuplicateTransition { .. }
      | ModelError::DuplicateLink { .. } => ErrorKind::Validation,
      ModelError::DuplicateName { .. }
      | ModelError::LinkOccupied { .. }
      | ModelError::NotFromCurrentState { .. } => ErrorKind::Precondition,
    }
  }
}
