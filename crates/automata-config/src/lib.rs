//! Automata Config
//!
//! This crate contains the serializable record types for automata. These types
//! represent finite automata, behavioral automata and networks before they are
//! resolved into validated instances.
//!
//! Records can be loaded from:
//! - JSON files (via the CLI, e.g. `automata language fa.json`)
//! - Any other `serde` format chosen by the caller
//!
//! Records reference states and automata by name only. The resolver checks the
//! referential integrity of those names and builds the validated instances.

mod automaton;
mod network;

pub use automaton::{BfaDef, EventTransitionDef, FaDef, TransitionDef};
pub use network::{LinkDef, NetworkDef};
