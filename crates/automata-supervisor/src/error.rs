//! Supervisor errors.

use automata_model::{ErrorKind, ModelError, NodeId};
use thiserror::Error;

/// Errors that can occur while driving a network.
#[derive(Debug, Error)]
pub enum SupervisorError {
  /// No automaton carries the given name.
  #[error("automaton not found: {0}")]
  AutomatonNotFound(String),

  /// The handle does not belong to the network.
  #[error("automaton {0} is not part of the network")]
  UnknownAutomaton(NodeId),

  #[error("transition '{transition}' not found in automaton '{automaton}'")]
  TransitionNotFound {
    automaton: String,
    transition: String,
  },

  /// The transition does not leave the current state, its input event is
  /// missing, or there are not enough empty output links.
  #[error("transition '{transition}' of automaton '{automaton}' is not enabled")]
  TransitionNotEnabled {
    automaton: String,
    transition: String,
  },

  #[error(transparent)]
  Model(#[from] ModelError),
}

impl SupervisorError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      SupervisorError::AutomatonNotFound(_)
      | SupervisorError::UnknownAutomaton(_)
      | SupervisorError::TransitionNotFound { .. } => ErrorKind::NotFound,
      SupervisorError::TransitionNotEnabled { .. } => ErrorKind::Precondition,
      SupervisorError::Model(error) => error.kind(),
    }
  }
}
