//! The state-elimination working copy.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use automata_model::{EdgeId, Fa, Graph, Named, NodeId, State, Transition};
use tracing::debug;

/// One rule application, described by state names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Rule {
  Sequence {
    state: String,
  },
  Parallel {
    source: String,
    target: String,
    branches: usize,
  },
  Elimination {
    state: String,
  },
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Rule::Sequence { state } => write!(f, "sequence({state})"),
      Rule::Parallel {
        source,
        target,
        branches,
      } => write!(f, "parallel({source} -> {target}, {branches} branches)"),
      Rule::Elimination { state } => write!(f, "elimination({state})"),
    }
  }
}

/// A transition lifted out of the graph before its state is removed.
struct Piece {
  source: NodeId,
  target: NodeId,
  transition: Transition,
  mark: Option<NodeId>,
}

/// Parallel transitions between one ordered pair of states, all carrying `mark`.
struct Bundle {
  source: NodeId,
  target: NodeId,
  edges: Vec<EdgeId>,
  mark: Option<NodeId>,
}

/// Acceptance states of `fa` by handle, or its final states when no state is
/// flagged for acceptance.
pub(crate) fn accepting_states(fa: &Fa) -> BTreeMap<NodeId, String> {
  let graph = fa.graph();
  let named = |id: NodeId| graph.node(id).map(|state| (id, state.name().to_string()));

  let acceptance: BTreeMap<NodeId, String> = fa.acceptance_states().filter_map(&named).collect();
  if !acceptance.is_empty() {
    return acceptance;
  }
  fa.final_states().filter_map(&named).collect()
}

/// Private copy of an automaton under reduction.
///
/// `start` never gains incoming transitions and `end` never gains outgoing
/// ones, so only transitions from `start` to `end` survive the reduction.
/// `marks` maps a transition into `end` to the acceptance state whose language
/// it carries; it stays empty when a single expression is extracted.
pub(crate) struct Reduction {
  graph: Graph<State, Transition>,
  start: NodeId,
  end: NodeId,
  accepting: BTreeMap<NodeId, String>,
  marks: BTreeMap<EdgeId, NodeId>,
}

impl Reduction {
  /// Working copy whose acceptance states are folded into a single exit.
  pub(crate) fn single(fa: &Fa) -> Self {
    let mut reduction = Self::copy(fa);

    let sole_exit = reduction
      .accepting
      .keys()
      .copied()
      .next()
      .filter(|&exit| reduction.accepting.len() == 1 && reduction.graph.out_degree(exit) == 0);
    reduction.end = match sole_exit {
      Some(exit) => exit,
      None => reduction.surrogate_acceptance(false),
    };
    reduction
  }

  /// Working copy that keeps every acceptance state's language apart.
  pub(crate) fn per_state(fa: &Fa) -> Self {
    let mut reduction = Self::copy(fa);
    reduction.end = reduction.surrogate_acceptance(true);
    reduction
  }

  fn copy(fa: &Fa) -> Self {
    let initial = fa.initial_state_id();
    let mut reduction = Self {
      graph: fa.graph().clone(),
      start: initial,
      end: initial,
      accepting: accepting_states(fa),
      marks: BTreeMap::new(),
    };
    reduction.start = reduction.surrogate_initial(initial);
    reduction
  }

  fn surrogate_initial(&mut self, initial: NodeId) -> NodeId {
    if self.graph.in_degree(initial) == 0 {
      return initial;
    }

    let mut state = State::new(self.graph.fresh_name("n0"));
    state.set_initial(true);
    let n0 = self.graph.ensure_node(state);
    if let Some(old) = self.graph.node_mut(initial) {
      old.set_initial(false);
    }
    self.connect(n0, initial, Transition::epsilon(), None);
    n0
  }

  /// Route every acceptance state into a fresh exit through epsilon
  /// transitions, marking each one with its origin when `mark` is set.
  fn surrogate_acceptance(&mut self, mark: bool) -> NodeId {
    let mut state = State::new(self.graph.fresh_name("nq"));
    state.set_acceptance(true);
    let nq = self.graph.ensure_node(state);

    let accepting: Vec<NodeId> = self.accepting.keys().copied().collect();
    for beta in accepting {
      if !mark && let Some(state) = self.graph.node_mut(beta) {
        state.set_acceptance(false);
        state.set_final(false);
      }
      self.connect(beta, nq, Transition::epsilon(), mark.then_some(beta));
    }
    nq
  }

  pub(crate) fn graph(&self) -> &Graph<State, Transition> {
    &self.graph
  }

  /// Apply rules until `done` holds or no rule is applicable.
  /// Returns the number of rule applications.
  pub(crate) fn run(&mut self, done: impl Fn(&Self) -> bool) -> usize {
    let mut applied = 0;
    while !done(self) {
      let Some(rule) = self.step() else {
        break;
      };
      debug!(
        %rule,
        states = self.graph.node_count(),
        transitions = self.graph.edge_count(),
        "reduction rule applied"
      );
      applied += 1;
    }
    applied
  }

  /// Apply the highest-precedence applicable rule.
  pub(crate) fn step(&mut self) -> Option<Rule> {
    if let Some(state) = self.sequence_candidate() {
      return Some(self.bypass(state));
    }
    if let Some(bundle) = self.parallel_candidate() {
      return Some(self.merge(bundle));
    }
    self.elimination_candidate().map(|state| self.eliminate(state))
  }

  pub(crate) fn has_single_transition(&self) -> bool {
    self.graph.edge_count() <= 1
  }

  /// Only the two surrogates remain and every acceptance state is carried by
  /// at most one transition.
  pub(crate) fn is_separated(&self) -> bool {
    if self.graph.node_ids().any(|id| self.is_interior(id)) {
      return false;
    }
    let mut seen = BTreeSet::new();
    self
      .graph
      .outgoing(self.start)
      .all(|edge| self.marks.get(&edge).is_none_or(|beta| seen.insert(*beta)))
  }

  /// Symbol of the transition from `start` to `end`, or epsilon if none survived.
  pub(crate) fn language(&self) -> String {
    self
      .graph
      .edges_between(self.start, self.end)
      .first()
      .and_then(|&edge| self.graph.edge(edge))
      .map(|transition| transition.symbol().to_string())
      .unwrap_or_default()
  }

  /// Symbols of the marked transitions leaving `start`, by acceptance state name.
  pub(crate) fn languages(&self) -> BTreeMap<String, String> {
    self
      .graph
      .outgoing(self.start)
      .filter_map(|edge| {
        let beta = self.marks.get(&edge)?;
        let name = self.accepting.get(beta)?;
        let transition = self.graph.edge(edge)?;
        Some((name.clone(), transition.symbol().to_string()))
      })
      .collect()
  }

  fn is_interior(&self, state: NodeId) -> bool {
    state != self.start && state != self.end
  }

  fn name_of(&self, state: NodeId) -> String {
    self
      .graph
      .node(state)
      .map(|state| state.name().to_string())
      .unwrap_or_default()
  }

  fn connect(&mut self, source: NodeId, target: NodeId, transition: Transition, mark: Option<NodeId>) {
    match self.graph.add_edge(source, target, transition) {
      Ok(edge) => {
        if let Some(beta) = mark {
          self.marks.insert(edge, beta);
        }
      }
      Err(error) => unreachable!("reduction connects live states only: {error}"),
    }
  }

  fn detach(&self, edge: EdgeId) -> Option<Piece> {
    let (source, target) = self.graph.endpoints(edge)?;
    Some(Piece {
      source,
      target,
      transition: self.graph.edge(edge)?.clone(),
      mark: self.marks.get(&edge).copied(),
    })
  }

  fn remove_state(&mut self, state: NodeId) {
    self.graph.remove_node(state);
    let graph = &self.graph;
    self.marks.retain(|edge, _| graph.contains_edge(*edge));
  }

  /// Interior state with one incoming and one outgoing transition, neither a
  /// self-loop. States whose outgoing transition is unmarked go first.
  fn sequence_candidate(&self) -> Option<NodeId> {
    self
      .graph
      .node_ids()
      .filter(|&id| self.is_interior(id))
      .filter(|&id| self.graph.in_degree(id) == 1 && self.graph.out_degree(id) == 1)
      .filter_map(|id| {
        let outgoing = self.graph.outgoing(id).next()?;
        if self.graph.target(outgoing) == Some(id) {
          return None;
        }
        Some((self.marks.contains_key(&outgoing), id))
      })
      .min()
      .map(|(_, id)| id)
  }

  fn bypass(&mut self, state: NodeId) -> Rule {
    let name = self.name_of(state);
    let pieces = self
      .graph
      .incoming(state)
      .next()
      .zip(self.graph.outgoing(state).next())
      .and_then(|(incoming, outgoing)| Some((self.detach(incoming)?, self.detach(outgoing)?)));

    self.remove_state(state);
    if let Some((first, second)) = pieces {
      self.connect(
        first.source,
        second.target,
        first.transition.concat(&second.transition),
        second.mark.or(first.mark),
      );
    }
    Rule::Sequence { state: name }
  }

  /// Transitions sharing an ordered pair of states and a mark, at least two of
  /// them. Unmarked bundles go first, then marked bundles by acceptance state
  /// name. Transitions carrying different marks never end up in one bundle.
  fn parallel_candidate(&self) -> Option<Bundle> {
    let mut bundles: BTreeMap<(NodeId, NodeId, Option<NodeId>), Vec<EdgeId>> = BTreeMap::new();
    for (edge, source, target, _) in self.graph.edges() {
      let mark = self.marks.get(&edge).copied();
      bundles.entry((source, target, mark)).or_default().push(edge);
    }

    bundles
      .into_iter()
      .filter(|(_, edges)| edges.len() > 1)
      .map(|((source, target, mark), edges)| Bundle {
        source,
        target,
        edges,
        mark,
      })
      .min_by_key(|bundle| {
        let mark_name = bundle
          .mark
          .and_then(|beta| self.accepting.get(&beta))
          .map(String::as_str);
        (mark_name, bundle.source, bundle.target)
      })
  }

  fn merge(&mut self, bundle: Bundle) -> Rule {
    let branches: Vec<Transition> = bundle
      .edges
      .iter()
      .filter_map(|&edge| self.graph.remove_edge(edge))
      .collect();
    for edge in &bundle.edges {
      self.marks.remove(edge);
    }

    let rule = Rule::Parallel {
      source: self.name_of(bundle.source),
      target: self.name_of(bundle.target),
      branches: branches.len(),
    };
    self.connect(
      bundle.source,
      bundle.target,
      Transition::alternation(&branches),
      bundle.mark,
    );
    rule
  }

  fn elimination_candidate(&self) -> Option<NodeId> {
    self.graph.node_ids().find(|&id| self.is_interior(id))
  }

  fn eliminate(&mut self, state: NodeId) -> Rule {
    let name = self.name_of(state);
    let self_loop = self
      .graph
      .edges_between(state, state)
      .first()
      .and_then(|&edge| self.graph.edge(edge))
      .cloned();
    let incoming: Vec<Piece> = self
      .graph
      .incoming(state)
      .filter_map(|edge| self.detach(edge))
      .filter(|piece| piece.source != state)
      .collect();
    let outgoing: Vec<Piece> = self
      .graph
      .outgoing(state)
      .filter_map(|edge| self.detach(edge))
      .filter(|piece| piece.target != state)
      .collect();

    self.remove_state(state);
    for first in &incoming {
      for second in &outgoing {
        let transition = match &self_loop {
          Some(self_loop) => Transition::through_loop(&first.transition, self_loop, &second.transition),
          None => first.transition.concat(&second.transition),
        };
        self.connect(
          first.source,
          second.target,
          transition,
          second.mark.or(first.mark),
        );
      }
    }
    Rule::Elimination { state: name }
  }
}
