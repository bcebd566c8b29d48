use automata_model::{ErrorKind, ModelError};
use thiserror::Error;

/// Errors that can occur while resolving a record.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// A state is listed twice in one automaton.
  #[error("automaton '{automaton}' lists state '{state}' more than once")]
  DuplicateState { automaton: String, state: String },

  /// Two automata of a network share a name.
  #[error("duplicate automaton name: {name}")]
  DuplicateAutomaton { name: String },

  /// A transition, flag or snapshot refers to a state the automaton does not list.
  #[error("automaton '{automaton}' has no state '{state}'")]
  UnknownState { automaton: String, state: String },

  /// A link refers to an automaton the network does not list.
  #[error("link '{link}' refers to unknown automaton '{automaton}'")]
  UnknownAutomaton { link: String, automaton: String },

  /// The record is well-formed but describes an invalid instance.
  #[error("invalid model: {0}")]
  Model(#[from] ModelError),
}

impl ResolveError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      ResolveError::DuplicateState { .. } | ResolveError::DuplicateAutomaton { .. } => {
        ErrorKind::Precondition
      }
      ResolveError::UnknownState { .. } | ResolveError::UnknownAutomaton { .. } => {
        ErrorKind::NotFound
      }
      ResolveError::Model(error) => error.kind(),
    }
  }
}
