//! Automata Language
//!
//! Extracts the regular language accepted by a finite automaton through state
//! elimination. The engine works on a private copy of the automaton's graph:
//!
//! 1. A surrogate initial state is added when the initial state has incoming edges.
//! 2. A surrogate acceptance state collects every acceptance state through
//!    epsilon transitions.
//! 3. Three rules are applied until a single transition remains, always in this
//!    order of precedence:
//!    - sequence: bypass a state with one incoming and one outgoing transition
//!    - parallel: merge the transitions between the same ordered pair of states
//!    - elimination: remove a state, rewriting every path through it
//!
//! `extract_language` yields one expression for the whole automaton.
//! `extract_languages` keeps one expression per acceptance state.

mod language;
mod reduction;

pub use language::{extract_language, extract_languages};
