//! Automata Supervisor
//!
//! Drives a network of behavioral automata one transition at a time. The
//! caller picks which enabled transition fires, so any interleaving of the
//! automata can be replayed.

mod error;
mod supervisor;

pub use error::SupervisorError;
pub use supervisor::{
  Execution, enabled_transitions, enabled_transitions_for_network, execute, execute_by_name,
};
