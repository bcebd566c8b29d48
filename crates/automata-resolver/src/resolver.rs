use std::collections::BTreeSet;

use automata_config::{BfaDef, EventTransitionDef, FaDef, NetworkDef};
use automata_model::{Bfa, EventTransition, Fa, Link, Network, Transition};
use tracing::debug;

use crate::error::ResolveError;

/// Resolver transforms records into validated automata and networks.
pub trait Resolver {
  /// Resolve a finite automaton record.
  fn resolve_fa(&self, def: FaDef) -> Result<Fa, ResolveError>;

  /// Resolve a behavioral automaton record, restoring its current state when
  /// the record carries one.
  fn resolve_bfa(&self, def: BfaDef) -> Result<Bfa, ResolveError>;

  /// Resolve a network record.
  ///
  /// This process:
  /// 1. Resolves every automaton and checks their names are unique
  /// 2. Validates that every link connects listed automata
  /// 3. Builds the network and restores buffered link events
  fn resolve_network(&self, def: NetworkDef) -> Result<Network, ResolveError>;
}

/// Standard resolver implementation.
///
/// States are registered in the order the record lists them, so handles
/// follow record order and describing a resolved instance yields the same
/// record back.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardResolver;

impl StandardResolver {
  pub fn new() -> Self {
    Self
  }

  /// Collect the listed states, rejecting duplicates.
  fn unique_states<'a>(
    &self,
    automaton: &str,
    states: &'a [String],
  ) -> Result<BTreeSet<&'a str>, ResolveError> {
    let mut unique = BTreeSet::new();
    for state in states {
      if !unique.insert(state.as_str()) {
        return Err(ResolveError::DuplicateState {
          automaton: automaton.to_string(),
          state: state.clone(),
        });
      }
    }
    Ok(unique)
  }

  /// Validate that every referenced state is listed.
  fn validate_states<'a>(
    &self,
    automaton: &str,
    states: &BTreeSet<&str>,
    referenced: impl IntoIterator<Item = &'a String>,
  ) -> Result<(), ResolveError> {
    for state in referenced {
      if !states.contains(state.as_str()) {
        return Err(ResolveError::UnknownState {
          automaton: automaton.to_string(),
          state: state.clone(),
        });
      }
    }
    Ok(())
  }

  fn event_transition(def: EventTransitionDef) -> EventTransition {
    let mut transition = EventTransition::new(def.name)
      .with_out_events(def.out_events)
      .with_observability_label(def.observability_label)
      .with_relevance_label(def.relevance_label);
    if let Some(event) = def.in_event {
      transition = transition.with_in_event(event);
    }
    transition
  }
}

impl Resolver for StandardResolver {
  fn resolve_fa(&self, def: FaDef) -> Result<Fa, ResolveError> {
    let states = self.unique_states(&def.name, &def.states)?;
    self.validate_states(
      &def.name,
      &states,
      std::iter::once(&def.initial_state)
        .chain(&def.acceptance_states)
        .chain(&def.final_states)
        .chain(def.transitions.iter().flat_map(|t| [&t.source, &t.target])),
    )?;

    let mut builder = Fa::builder(def.name.as_str());
    for state in &def.states {
      builder.put_state(state);
    }
    builder.put_initial_state(&def.initial_state);
    for state in &def.acceptance_states {
      builder.put_acceptance_state(state);
    }
    for state in &def.final_states {
      builder.put_final_state(state);
    }
    for transition in def.transitions {
      builder.put_transition(
        &transition.source,
        &transition.target,
        Transition::new(transition.symbol),
      );
    }

    let fa = builder.build()?;
    debug!(
      automaton = %fa.name(),
      states = fa.graph().node_count(),
      transitions = fa.graph().edge_count(),
      "finite automaton resolved"
    );
    Ok(fa)
  }

  fn resolve_bfa(&self, def: BfaDef) -> Result<Bfa, ResolveError> {
    let states = self.unique_states(&def.name, &def.states)?;
    self.validate_states(
      &def.name,
      &states,
      std::iter::once(&def.initial_state)
        .chain(&def.current_state)
        .chain(def.transitions.iter().flat_map(|t| [&t.source, &t.target])),
    )?;

    let mut builder = Bfa::builder(def.name.as_str());
    for state in &def.states {
      builder.put_state(state);
    }
    builder.put_initial_state(&def.initial_state);
    for transition in def.transitions {
      let source = transition.source.clone();
      let target = transition.target.clone();
      builder.put_transition(&source, &target, Self::event_transition(transition));
    }

    let mut bfa = builder.build()?;
    if let Some(current) = def.current_state.as_deref().and_then(|name| bfa.state(name)) {
      bfa.set_current_state(current)?;
    }
    debug!(
      automaton = %bfa.name(),
      states = bfa.graph().node_count(),
      transitions = bfa.graph().edge_count(),
      current_state = ?def.current_state,
      "behavioral automaton resolved"
    );
    Ok(bfa)
  }

  fn resolve_network(&self, def: NetworkDef) -> Result<Network, ResolveError> {
    let mut names = BTreeSet::new();
    for automaton in &def.automata {
      if !names.insert(automaton.name.clone()) {
        return Err(ResolveError::DuplicateAutomaton {
          name: automaton.name.clone(),
        });
      }
    }
    for link in &def.links {
      for automaton in [&link.source, &link.target] {
        if !names.contains(automaton) {
          return Err(ResolveError::UnknownAutomaton {
            link: link.name.clone(),
            automaton: automaton.clone(),
          });
        }
      }
    }

    let mut builder = Network::builder();
    for automaton in def.automata {
      builder.put_automaton(self.resolve_bfa(automaton)?);
    }
    for link in &def.links {
      builder.put_link(&link.source, &link.target, Link::new(link.name.as_str()));
    }
    let mut network = builder.build()?;

    for link in def.links {
      if let (Some(event), Some(id)) = (link.event, network.link(&link.name)) {
        network.fill_link(id, event)?;
      }
    }
    debug!(
      automata = network.graph().node_count(),
      links = network.graph().edge_count(),
      "network resolved"
    );
    Ok(network)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use automata_config::{LinkDef, TransitionDef};
  use automata_model::{ErrorKind, ModelError, Named};

  fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
  }

  fn fa_def() -> FaDef {
    FaDef {
      name: "ab".to_string(),
      states: strings(&["0", "1", "2"]),
      initial_state: "0".to_string(),
      acceptance_states: vec![],
      final_states: strings(&["2"]),
      transitions: vec![
        TransitionDef {
          source: "0".to_string(),
          target: "1".to_string(),
          symbol: "a".to_string(),
        },
        TransitionDef {
          source: "1".to_string(),
          target: "2".to_string(),
          symbol: "b".to_string(),
        },
      ],
    }
  }

  fn bfa_def(name: &str, transition: EventTransitionDef) -> BfaDef {
    BfaDef {
      name: name.to_string(),
      states: vec![transition.source.clone(), transition.target.clone()],
      initial_state: transition.source.clone(),
      transitions: vec![transition],
      current_state: None,
    }
  }

  fn send(name: &str, source: &str, target: &str, event: &str) -> EventTransitionDef {
    EventTransitionDef {
      name: name.to_string(),
      source: source.to_string(),
      target: target.to_string(),
      in_event: None,
      out_events: vec![event.to_string()],
      observability_label: String::new(),
      relevance_label: String::new(),
    }
  }

  #[test]
  fn test_resolve_fa() {
    let fa = StandardResolver::new().resolve_fa(fa_def()).unwrap();

    assert_eq!(fa.name(), "ab");
    assert_eq!(fa.initial_state().map(Named::name), Some("0"));
    assert_eq!(fa.final_states().count(), 1);
    assert_eq!(fa.graph().edge_count(), 2);
  }

  #[test]
  fn test_duplicate_state() {
    let mut def = fa_def();
    def.states.push("1".to_string());

    let result = StandardResolver::new().resolve_fa(def);
    assert!(matches!(result, Err(ResolveError::DuplicateState { ref state, .. }) if state == "1"));
  }

  #[test]
  fn test_transition_to_unlisted_state() {
    let mut def = fa_def();
    def.transitions[1].target = "9".to_string();

    let result = StandardResolver::new().resolve_fa(def);
    assert!(matches!(result, Err(ResolveError::UnknownState { ref state, .. }) if state == "9"));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
  }

  #[test]
  fn test_missing_final_state_is_a_model_error() {
    let mut def = fa_def();
    def.final_states.clear();

    let result = StandardResolver::new().resolve_fa(def);
    assert!(matches!(
      result,
      Err(ResolveError::Model(ModelError::NoFinalState { .. }))
    ));
  }

  #[test]
  fn test_current_state_snapshot_is_restored() {
    let mut def = bfa_def("C3", send("t3a", "30", "31", "e2(L2)"));
    def.current_state = Some("31".to_string());

    let bfa = StandardResolver::new().resolve_bfa(def).unwrap();
    assert_eq!(bfa.current_state().map(Named::name), Some("31"));
    assert_eq!(bfa.initial_state().map(Named::name), Some("30"));
  }

  #[test]
  fn test_unknown_current_state() {
    let mut def = bfa_def("C3", send("t3a", "30", "31", "e2(L2)"));
    def.current_state = Some("39".to_string());

    let result = StandardResolver::new().resolve_bfa(def);
    assert!(matches!(result, Err(ResolveError::UnknownState { .. })));
  }

  #[test]
  fn test_network_links_and_events() {
    let def = NetworkDef {
      automata: vec![
        bfa_def("C3", send("t3a", "30", "31", "e2(L2)")),
        bfa_def("C2", send("t2b", "21", "20", "e3(L3)")),
      ],
      links: vec![LinkDef {
        name: "L2".to_string(),
        source: "C3".to_string(),
        target: "C2".to_string(),
        event: Some("e2(L2)".to_string()),
      }],
    };

    let network = StandardResolver::new().resolve_network(def).unwrap();
    let l2 = network.link("L2").unwrap();
    assert_eq!(network.link_at(l2).and_then(Link::event), Some("e2(L2)"));
  }

  #[test]
  fn test_network_rejects_unknown_endpoint() {
    let def = NetworkDef {
      automata: vec![bfa_def("C3", send("t3a", "30", "31", "e2(L2)"))],
      links: vec![LinkDef {
        name: "L2".to_string(),
        source: "C3".to_string(),
        target: "C2".to_string(),
        event: None,
      }],
    };

    let result = StandardResolver::new().resolve_network(def);
    assert!(matches!(
      result,
      Err(ResolveError::UnknownAutomaton { ref automaton, .. }) if automaton == "C2"
    ));
  }

  #[test]
  fn test_network_rejects_duplicate_automaton() {
    let def = NetworkDef {
      automata: vec![
        bfa_def("C3", send("t3a", "30", "31", "e2(L2)")),
        bfa_def("C3", send("t3b", "31", "30", "e2(L2)")),
      ],
      links: vec![],
    };

    let result = StandardResolver::new().resolve_network(def);
    assert!(matches!(result, Err(ResolveError::DuplicateAutomaton { .. })));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Precondition);
  }
}
