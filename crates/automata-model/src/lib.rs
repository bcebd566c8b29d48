//! Automata Model
//!
//! This crate provides the validated representation of automata:
//! - A named, directed multigraph with stable node and edge handles
//! - Finite automata (`Fa`) over symbol-labeled transitions
//! - Behavioral automata (`Bfa`) over event transitions, with a simulation cursor
//! - Networks of behavioral automata connected by single-slot `Link`s
//!
//! Instances are assembled with builders and validated on `build()`. A built
//! automaton never holds a dangling initial state, an isolated state or a
//! duplicated name.

mod bfa;
mod builder;
mod error;
mod fa;
mod graph;
mod link;
mod network;
mod state;
mod transition;

pub use bfa::Bfa;
pub use builder::{AutomatonBuilder, BfaBuilder, FaBuilder, NetworkBuilder};
pub use error::{ErrorKind, ModelError};
pub use fa::Fa;
pub use graph::{EdgeId, Graph, Named, NodeId, Rename};
pub use link::Link;
pub use network::Network;
pub use state::State;
pub use transition::{EPSILON, EventTransition, Transition};
