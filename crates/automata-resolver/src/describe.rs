//! Instances back to records.

use automata_config::{BfaDef, EventTransitionDef, FaDef, LinkDef, NetworkDef, TransitionDef};
use automata_model::{Bfa, Fa, Graph, Named, Network, NodeId, State};

fn state_names<'a, E>(
  graph: &'a Graph<State, E>,
  keep: impl Fn(&State) -> bool + 'a,
) -> impl Iterator<Item = String> + 'a {
  graph
    .nodes()
    .filter(move |(_, state)| keep(state))
    .map(|(_, state)| state.name().to_string())
}

fn name_of<E>(graph: &Graph<State, E>, id: NodeId) -> String {
  graph
    .node(id)
    .map(|state| state.name().to_string())
    .unwrap_or_default()
}

/// Record of `fa`, listing states and transitions in handle order.
pub fn describe_fa(fa: &Fa) -> FaDef {
  let graph = fa.graph();
  FaDef {
    name: fa.name().to_string(),
    states: state_names(graph, |_| true).collect(),
    initial_state: name_of(graph, fa.initial_state_id()),
    acceptance_states: state_names(graph, State::is_acceptance).collect(),
    final_states: state_names(graph, State::is_final).collect(),
    transitions: graph
      .edges()
      .map(|(_, source, target, transition)| TransitionDef {
        source: name_of(graph, source),
        target: name_of(graph, target),
        symbol: transition.symbol().to_string(),
      })
      .collect(),
  }
}

/// Record of `bfa`. The current state is recorded only when it differs from
/// the initial state.
pub fn describe_bfa(bfa: &Bfa) -> BfaDef {
  let graph = bfa.graph();
  let current_state =
    (bfa.current_state_id() != bfa.initial_state_id()).then(|| name_of(graph, bfa.current_state_id()));

  BfaDef {
    name: bfa.name().to_string(),
    states: state_names(graph, |_| true).collect(),
    initial_state: name_of(graph, bfa.initial_state_id()),
    transitions: graph
      .edges()
      .map(|(_, source, target, transition)| EventTransitionDef {
        name: transition.name().to_string(),
        source: name_of(graph, source),
        target: name_of(graph, target),
        in_event: transition.in_event().map(str::to_string),
        out_events: transition.out_events().iter().cloned().collect(),
        observability_label: transition.observability_label().to_string(),
        relevance_label: transition.relevance_label().to_string(),
      })
      .collect(),
    current_state,
  }
}

/// Record of `network`, including the events its links hold.
pub fn describe_network(network: &Network) -> NetworkDef {
  let automaton_name = |id: NodeId| network.bfa(id).map(|bfa| bfa.name().to_string()).unwrap_or_default();

  NetworkDef {
    automata: network.automata().map(|(_, bfa)| describe_bfa(bfa)).collect(),
    links: network
      .links()
      .map(|(_, source, target, link)| LinkDef {
        name: link.name().to_string(),
        source: automaton_name(source),
        target: automaton_name(target),
        event: link.event().map(str::to_string),
      })
      .collect(),
  }
}
