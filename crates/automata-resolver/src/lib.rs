//! Automata Resolver
//!
//! Turns the serializable records of `automata-config` into validated
//! automata and networks, and describes built instances back as records.

mod describe;
mod error;
mod resolver;

pub use describe::{describe_bfa, describe_fa, describe_network};
pub use error::ResolveError;
pub use resolver::{Resolver, StandardResolver};
