use std::collections::BTreeSet;
use std::fmt;

use crate::graph::Named;

/// The epsilon symbol.
pub const EPSILON: &str = "";

/// A symbol-labeled edge of a finite automaton.
///
/// The symbol is a regular expression over the automaton's alphabet. Built
/// automata carry single alphabet elements (or epsilon); the language engine
/// grows symbols through the merge operations below. Every composite symbol
/// that contains an alternation is parenthesized, so concatenation never
/// needs extra grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
  symbol: String,
}

impl Transition {
  pub fn new(symbol: impl Into<String>) -> Self {
    Self {
      symbol: symbol.into(),
    }
  }

  pub fn epsilon() -> Self {
    Self::new(EPSILON)
  }

  pub fn symbol(&self) -> &str {
    &self.symbol
  }

  pub fn is_epsilon(&self) -> bool {
    self.symbol.is_empty()
  }

  /// `self` followed by `next`.
  pub fn concat(&self, next: &Transition) -> Transition {
    Transition::new(format!("{}{}", self.symbol, next.symbol))
  }

  /// Alternation of a parallel bundle: `a`, `b` becomes `(a|b)`.
  pub fn alternation<'a>(bundle: impl IntoIterator<Item = &'a Transition>) -> Transition {
    let branches: Vec<&str> = bundle.into_iter().map(Transition::symbol).collect();
    Transition::new(format!("({})", branches.join("|")))
  }

  /// Bypass of a state with a self-loop: `x`, `y`, `z` becomes `(x(y)*z)`.
  pub fn through_loop(incoming: &Transition, self_loop: &Transition, outgoing: &Transition) -> Transition {
    Transition::new(format!(
      "({}({})*{})",
      incoming.symbol, self_loop.symbol, outgoing.symbol
    ))
  }
}

impl fmt::Display for Transition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_epsilon() {
      f.write_str("ε")
    } else {
      f.write_str(&self.symbol)
    }
  }
}

/// An edge of a behavioral automaton.
///
/// Firing the transition consumes `in_event` (when present) from an incoming
/// link and writes every `out_events` entry to an empty outgoing link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventTransition {
  name: String,
  in_event: Option<String>,
  out_events: BTreeSet<String>,
  observability_label: String,
  relevance_label: String,
}

impl EventTransition {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      in_event: None,
      out_events: BTreeSet::new(),
      observability_label: String::new(),
      relevance_label: String::new(),
    }
  }

  pub fn with_in_event(mut self, event: impl Into<String>) -> Self {
    self.in_event = Some(event.into());
    self
  }

  pub fn with_out_event(mut self, event: impl Into<String>) -> Self {
    self.out_events.insert(event.into());
    self
  }

  pub fn with_out_events<I, S>(mut self, events: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.out_events.extend(events.into_iter().map(Into::into));
    self
  }

  pub fn with_observability_label(mut self, label: impl Into<String>) -> Self {
    self.observability_label = label.into();
    self
  }

  pub fn with_relevance_label(mut self, label: impl Into<String>) -> Self {
    self.relevance_label = label.into();
    self
  }

  pub fn in_event(&self) -> Option<&str> {
    self.in_event.as_deref()
  }

  pub fn out_events(&self) -> &BTreeSet<String> {
    &self.out_events
  }

  pub fn observability_label(&self) -> &str {
    &self.observability_label
  }

  pub fn relevance_label(&self) -> &str {
    &self.relevance_label
  }
}

impl Named for EventTransition {
  fn name(&self) -> &str {
    &self.name
  }
}
