//! Enabled-transition queries and transition execution.

use std::collections::{BTreeMap, BTreeSet};

use automata_model::{Bfa, EdgeId, EventTransition, Link, Named, Network, NodeId};
use tracing::{Span, debug, field, info, instrument, warn};

use crate::error::SupervisorError;

/// Outcome of one executed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
  pub automaton: NodeId,
  pub transition: EdgeId,
  /// Incoming link the input event was taken from.
  pub consumed: Option<EdgeId>,
  /// Outgoing links filled with the output events, in event order.
  pub produced: Vec<EdgeId>,
  /// Current state after the step.
  pub state: NodeId,
}

fn lookup(network: &Network, bfa: NodeId) -> Result<&Bfa, SupervisorError> {
  network.bfa(bfa).ok_or(SupervisorError::UnknownAutomaton(bfa))
}

fn current_state_name(bfa: &Bfa) -> &str {
  bfa.current_state().map(Named::name).unwrap_or_default()
}

/// First incoming link of `bfa` holding `event`.
fn input_link(network: &Network, bfa: NodeId, event: &str) -> Option<EdgeId> {
  network
    .incoming_links(bfa)
    .find(|&link| network.link_at(link).and_then(Link::event) == Some(event))
}

/// Empty outgoing links of `bfa`, lowest handle first.
fn empty_output_links(network: &Network, bfa: NodeId) -> Vec<EdgeId> {
  network
    .outgoing_links(bfa)
    .filter(|&link| network.link_at(link).is_some_and(Link::is_empty))
    .collect()
}

fn is_enabled(network: &Network, bfa: NodeId, transition: &EventTransition) -> bool {
  let input_ready = transition
    .in_event()
    .is_none_or(|event| input_link(network, bfa, event).is_some());
  input_ready && empty_output_links(network, bfa).len() >= transition.out_events().len()
}

/// Transitions of `bfa` that may fire in the current global state.
///
/// A transition leaving the current state is enabled when its input event,
/// if any, waits on one of the incoming links and there are at least as many
/// empty outgoing links as it produces events.
pub fn enabled_transitions(network: &Network, bfa: NodeId) -> Result<BTreeSet<EdgeId>, SupervisorError> {
  let automaton = lookup(network, bfa)?;
  let enabled: BTreeSet<EdgeId> = automaton
    .transitions_from_current()
    .filter(|(_, transition)| is_enabled(network, bfa, transition))
    .map(|(id, _)| id)
    .collect();

  debug!(
    automaton = %automaton.name(),
    state = %current_state_name(automaton),
    enabled = enabled.len(),
    "enabled transitions computed"
  );
  Ok(enabled)
}

/// Enabled transitions of every automaton in the network.
pub fn enabled_transitions_for_network(network: &Network) -> BTreeMap<NodeId, BTreeSet<EdgeId>> {
  network
    .automata()
    .filter_map(|(id, _)| enabled_transitions(network, id).ok().map(|enabled| (id, enabled)))
    .collect()
}

/// Fire `transition` of `bfa` as one atomic step.
///
/// The input event is taken from the first incoming link holding it, each
/// output event (in sorted order) fills the next empty outgoing link, and the
/// cursor moves to the transition's target. A transition that is not enabled
/// leaves the network untouched.
#[instrument(skip_all, fields(automaton = field::Empty, transition = field::Empty))]
pub fn execute(network: &mut Network, bfa: NodeId, transition: EdgeId) -> Result<Execution, SupervisorError> {
  let automaton = lookup(network, bfa)?;
  let automaton_name = automaton.name().to_string();
  let event_transition =
    automaton
      .graph()
      .edge(transition)
      .ok_or_else(|| SupervisorError::TransitionNotFound {
        automaton: automaton_name.clone(),
        transition: transition.to_string(),
      })?;
  let transition_name = event_transition.name().to_string();
  Span::current()
    .record("automaton", automaton_name.as_str())
    .record("transition", transition_name.as_str());

  let from_current = automaton.graph().source(transition) == Some(automaton.current_state_id());
  if !from_current || !is_enabled(network, bfa, event_transition) {
    warn!(
      automaton = %automaton_name,
      transition = %transition_name,
      state = %current_state_name(automaton),
      "transition is not enabled"
    );
    return Err(SupervisorError::TransitionNotEnabled {
      automaton: automaton_name,
      transition: transition_name,
    });
  }

  let consumed = event_transition
    .in_event()
    .and_then(|event| input_link(network, bfa, event));
  let outputs: Vec<(EdgeId, String)> = empty_output_links(network, bfa)
    .into_iter()
    .zip(event_transition.out_events().iter().cloned())
    .collect();

  if let Some(link) = consumed {
    network.clear_link(link);
  }
  let mut produced = Vec::with_capacity(outputs.len());
  for (link, event) in outputs {
    network.fill_link(link, event)?;
    produced.push(link);
  }
  let state = network
    .bfa_mut(bfa)
    .ok_or(SupervisorError::UnknownAutomaton(bfa))?
    .advance(transition)?;

  info!(
    automaton = %automaton_name,
    transition = %transition_name,
    consumed = ?consumed,
    produced = ?produced,
    state = %network.bfa(bfa).map(current_state_name).unwrap_or_default(),
    "transition executed"
  );
  Ok(Execution {
    automaton: bfa,
    transition,
    consumed,
    produced,
    state,
  })
}

/// `execute` addressing the automaton and transition by name.
pub fn execute_by_name(
  network: &mut Network,
  automaton: &str,
  transition: &str,
) -> Result<Execution, SupervisorError> {
  let bfa = network
    .automaton(automaton)
    .ok_or_else(|| SupervisorError::AutomatonNotFound(automaton.to_string()))?;
  let edge = network
    .bfa(bfa)
    .and_then(|b| b.transition(transition))
    .ok_or_else(|| SupervisorError::TransitionNotFound {
      automaton: automaton.to_string(),
      transition: transition.to_string(),
    })?;
  execute(network, bfa, edge)
}
