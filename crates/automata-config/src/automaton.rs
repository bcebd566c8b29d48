use serde::{Deserialize, Serialize};

/// A labeled transition of a finite automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDef {
  pub source: String,
  pub target: String,
  /// Symbol over the automaton's alphabet. The empty string is epsilon.
  #[serde(default)]
  pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaDef {
  pub name: String,
  pub states: Vec<String>,
  pub initial_state: String,
  #[serde(default)]
  pub acceptance_states: Vec<String>,
  #[serde(default)]
  pub final_states: Vec<String>,
  #[serde(default)]
  pub transitions: Vec<TransitionDef>,
}

/// An event-driven transition of a behavioral automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTransitionDef {
  /// Transition name, unique within its automaton (e.g. "t3a")
  pub name: String,
  pub source: String,
  pub target: String,
  /// Event that must be waiting on an incoming link, e.g. "e2(L2)"
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub in_event: Option<String>,
  /// Events written to empty outgoing links when the transition fires
  #[serde(default)]
  pub out_events: Vec<String>,
  #[serde(default)]
  pub observability_label: String,
  #[serde(default)]
  pub relevance_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BfaDef {
  pub name: String,
  pub states: Vec<String>,
  pub initial_state: String,
  #[serde(default)]
  pub transitions: Vec<EventTransitionDef>,
  /// Simulation cursor. Defaults to the initial state when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub current_state: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fa_def_defaults() {
    let json = r#"{
      "name": "single",
      "states": ["0"],
      "initial_state": "0",
      "final_states": ["0"]
    }"#;

    let def: FaDef = serde_json::from_str(json).unwrap();
    assert_eq!(def.name, "single");
    assert!(def.acceptance_states.is_empty());
    assert!(def.transitions.is_empty());
  }

  #[test]
  fn test_epsilon_symbol_defaults_to_empty() {
    let json = r#"{ "source": "1", "target": "3" }"#;
    let def: TransitionDef = serde_json::from_str(json).unwrap();
    assert_eq!(def.symbol, "");
  }

  #[test]
  fn test_event_transition_skips_missing_in_event() {
    let def = EventTransitionDef {
      name: "t3a".to_string(),
      source: "30".to_string(),
      target: "31".to_string(),
      in_event: None,
      out_events: vec!["e2(L2)".to_string()],
      observability_label: "o3".to_string(),
      relevance_label: String::new(),
    };

    let value = serde_json::to_value(&def).unwrap();
    assert!(value.get("in_event").is_none());
    assert_eq!(value["out_events"][0], "e2(L2)");
  }
}
