use std::fmt;

use crate::graph::{Named, Rename};

/// A vertex of a finite or behavioral automaton.
///
/// The final and acceptance flags are independent: an automaton may mark a
/// state as one, the other, or both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
  name: String,
  initial: bool,
  final_state: bool,
  acceptance: bool,
}

impl State {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      initial: false,
      final_state: false,
      acceptance: false,
    }
  }

  pub fn is_initial(&self) -> bool {
    self.initial
  }

  pub fn is_final(&self) -> bool {
    self.final_state
  }

  pub fn is_acceptance(&self) -> bool {
    self.acceptance
  }

  pub fn set_initial(&mut self, initial: bool) {
    self.initial = initial;
  }

  pub fn set_final(&mut self, final_state: bool) {
    self.final_state = final_state;
  }

  pub fn set_acceptance(&mut self, acceptance: bool) {
    self.acceptance = acceptance;
  }
}

impl Named for State {
  fn name(&self) -> &str {
    &self.name
  }
}

impl Rename for State {
  fn rename(&mut self, name: String) {
    self.name = name;
  }
}

impl fmt::Display for State {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.name)
  }
}
