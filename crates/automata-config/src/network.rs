use serde::{Deserialize, Serialize};

use crate::automaton::BfaDef;

/// A single-slot channel from one behavioral automaton to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDef {
  pub name: String,
  /// Name of the automaton writing into the link
  pub source: String,
  /// Name of the automaton reading from the link
  pub target: String,
  /// Buffered event, if the link is occupied
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub event: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDef {
  pub automata: Vec<BfaDef>,
  #[serde(default)]
  pub links: Vec<LinkDef>,
}
