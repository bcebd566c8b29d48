use std::collections::BTreeSet;

use automata_language::{extract_language, extract_languages};
use automata_model::{Fa, Named, NodeId, Transition};
use proptest::prelude::*;
use regex::Regex;

fn canonical(accepting_flag: bool) -> Fa {
  let mut builder = Fa::builder("canonical");
  builder.put_initial_state("0");
  if accepting_flag {
    builder.put_acceptance_state("4");
  } else {
    builder.put_final_state("4");
  }
  builder
    .put_transition("0", "1", Transition::new("a"))
    .put_transition("0", "2", Transition::new("a"))
    .put_transition("1", "3", Transition::epsilon())
    .put_transition("3", "3", Transition::new("a"))
    .put_transition("3", "4", Transition::new("c"))
    .put_transition("2", "2", Transition::new("c"))
    .put_transition("2", "3", Transition::new("b"));
  builder.build().unwrap()
}

fn anchored(expression: &str) -> Regex {
  Regex::new(&format!("^(?:{expression})$")).unwrap()
}

fn words(alphabet: &[char], max_len: usize) -> Vec<String> {
  let mut all = vec![String::new()];
  let mut frontier = vec![String::new()];
  for _ in 0..max_len {
    frontier = frontier
      .iter()
      .flat_map(|prefix| {
        alphabet.iter().map(move |letter| {
          let mut word = prefix.clone();
          word.push(*letter);
          word
        })
      })
      .collect();
    all.extend(frontier.iter().cloned());
  }
  all
}

fn epsilon_closure(fa: &Fa, states: BTreeSet<NodeId>) -> BTreeSet<NodeId> {
  let graph = fa.graph();
  let mut pending: Vec<NodeId> = states.iter().copied().collect();
  let mut closure = states;
  while let Some(state) = pending.pop() {
    for edge in graph.outgoing(state) {
      let is_epsilon = graph.edge(edge).is_some_and(Transition::is_epsilon);
      if let Some(target) = graph.target(edge).filter(|_| is_epsilon)
        && closure.insert(target)
      {
        pending.push(target);
      }
    }
  }
  closure
}

/// States reachable from the initial state by reading `word`.
fn reached(fa: &Fa, word: &str) -> BTreeSet<NodeId> {
  let graph = fa.graph();
  let mut current = epsilon_closure(fa, BTreeSet::from([fa.initial_state_id()]));
  for letter in word.chars() {
    let letter = letter.to_string();
    let next = current
      .iter()
      .flat_map(|&state| graph.outgoing(state))
      .filter(|&edge| graph.edge(edge).is_some_and(|t| t.symbol() == letter))
      .filter_map(|edge| graph.target(edge))
      .collect();
    current = epsilon_closure(fa, next);
  }
  current
}

#[test]
fn test_canonical_language() {
  let expected = anchored("aa*c|ac*ba*c");
  let language = extract_language(&canonical(false));
  let actual = anchored(&language);

  for word in words(&['a', 'b', 'c'], 6) {
    assert_eq!(
      actual.is_match(&word),
      expected.is_match(&word),
      "{language} disagrees on {word:?}"
    );
  }
}

#[test]
fn test_canonical_language_per_state() {
  let expected = anchored("aa*c|ac*ba*c");
  let languages = extract_languages(&canonical(true));
  assert_eq!(languages.len(), 1);

  let actual = anchored(&languages["4"]);
  for word in words(&['a', 'b', 'c'], 6) {
    assert_eq!(actual.is_match(&word), expected.is_match(&word), "{word:?}");
  }
}

#[test]
fn test_per_state_languages_are_kept_apart() {
  let mut builder = Fa::builder("branches");
  builder
    .put_initial_state("0")
    .put_acceptance_state("1")
    .put_acceptance_state("2")
    .put_transition("0", "1", Transition::new("a"))
    .put_transition("1", "1", Transition::new("b"))
    .put_transition("1", "2", Transition::new("c"))
    .put_transition("0", "2", Transition::new("c"));
  let fa = builder.build().unwrap();

  let languages = extract_languages(&fa);
  let one = anchored(&languages["1"]);
  let two = anchored(&languages["2"]);

  assert!(one.is_match("abb"));
  assert!(!one.is_match("c"));
  assert!(two.is_match("c"));
  assert!(two.is_match("abbc"));
  assert!(!two.is_match("ab"));
}

#[test]
fn test_converging_acceptance_states_keep_every_path() {
  let mut builder = Fa::builder("converge");
  builder
    .put_initial_state("0")
    .put_acceptance_state("A")
    .put_acceptance_state("B")
    .put_transition("0", "A", Transition::new("x"))
    .put_transition("0", "B", Transition::new("y"))
    .put_transition("B", "A", Transition::new("z"));
  let fa = builder.build().unwrap();

  let languages = extract_languages(&fa);
  let a = anchored(&languages["A"]);
  let b = anchored(&languages["B"]);

  assert!(a.is_match("x"));
  assert!(a.is_match("yz"));
  assert!(!a.is_match("y"));
  assert!(b.is_match("y"));
  assert!(!b.is_match("x"));
}

#[test]
fn test_initial_acceptance_state_keeps_epsilon() {
  let mut builder = Fa::builder("bounce");
  builder
    .put_initial_state("s0")
    .put_acceptance_state("s0")
    .put_acceptance_state("s1")
    .put_transition("s0", "s1", Transition::epsilon())
    .put_transition("s1", "s0", Transition::new("a"));
  let fa = builder.build().unwrap();

  let languages = extract_languages(&fa);
  let s0 = anchored(&languages["s0"]);
  let s1 = anchored(&languages["s1"]);

  for word in ["", "a", "aa", "aaa"] {
    assert!(s0.is_match(word), "{word:?}");
    assert!(s1.is_match(word), "{word:?}");
  }
}

#[test]
fn test_unreachable_final_state_gives_empty_expression() {
  let mut builder = Fa::builder("dead");
  builder
    .put_initial_state("0")
    .put_final_state("2")
    .put_transition("0", "1", Transition::new("a"))
    .put_transition("2", "1", Transition::new("b"));
  let fa = builder.build().unwrap();

  assert_eq!(extract_language(&fa), "");
}

const STATES: usize = 4;

#[derive(Debug, Clone)]
struct Shape {
  transitions: Vec<(usize, usize, &'static str)>,
  accepting: Vec<bool>,
}

fn shape() -> impl Strategy<Value = Shape> {
  let symbol = prop_oneof![Just(""), Just("a"), Just("b")];
  let transition = (0..STATES, 0..STATES, symbol);
  (
    (0..STATES, prop_oneof![Just(""), Just("a"), Just("b")]),
    prop::collection::vec(transition, 0..7),
    prop::collection::vec(any::<bool>(), STATES),
  )
    .prop_map(|((first_target, first_symbol), rest, accepting)| {
      let mut transitions = vec![(0, first_target, first_symbol)];
      transitions.extend(rest);
      Shape {
        transitions,
        accepting,
      }
    })
}

/// Every referenced state takes part in a transition and at least one of them
/// accepts.
fn build(shape: &Shape, acceptance: bool) -> Fa {
  let mut builder = Fa::builder("random");
  builder.put_initial_state("s0");

  let referenced: BTreeSet<usize> = shape
    .transitions
    .iter()
    .flat_map(|&(source, target, _)| [source, target])
    .collect();
  let mut accepting: Vec<usize> = referenced
    .iter()
    .copied()
    .filter(|&state| shape.accepting[state])
    .collect();
  if accepting.is_empty() {
    accepting.push(shape.transitions[shape.transitions.len() - 1].1);
  }

  for state in accepting {
    let name = format!("s{state}");
    if acceptance {
      builder.put_acceptance_state(&name);
    } else {
      builder.put_final_state(&name);
    }
  }
  for &(source, target, symbol) in &shape.transitions {
    builder.put_transition(
      &format!("s{source}"),
      &format!("s{target}"),
      Transition::new(symbol),
    );
  }
  builder.build().unwrap()
}

proptest! {
  #[test]
  fn single_expression_matches_simulation(shape in shape()) {
    let fa = build(&shape, false);
    let finals: BTreeSet<NodeId> = fa.final_states().collect();
    let language = extract_language(&fa);
    let expression = anchored(&language);

    for word in words(&['a', 'b'], 4) {
      let accepted = !reached(&fa, &word).is_disjoint(&finals);
      if language.is_empty() {
        // Epsilon and the empty language share the empty expression.
        prop_assert!(!accepted || word.is_empty(), "{word:?} accepted by {shape:?}");
      } else {
        prop_assert_eq!(expression.is_match(&word), accepted, "{} on {:?}", language, word);
      }
    }
  }

  #[test]
  fn per_state_expressions_match_simulation(shape in shape()) {
    let fa = build(&shape, true);
    let languages = extract_languages(&fa);
    let simulated: Vec<(NodeId, BTreeSet<String>)> = fa
      .acceptance_states()
      .map(|state| {
        let accepted = words(&['a', 'b'], 4)
          .into_iter()
          .filter(|word| reached(&fa, word).contains(&state))
          .collect();
        (state, accepted)
      })
      .collect();

    for (state, accepted) in simulated {
      let name = fa.graph().node(state).map(|s| s.name().to_string()).unwrap();
      match languages.get(&name) {
        Some(language) => {
          let expression = anchored(language);
          for word in words(&['a', 'b'], 4) {
            prop_assert_eq!(expression.is_match(&word), accepted.contains(&word), "{} {} on {:?}", name, language, word);
          }
        }
        None => prop_assert!(accepted.is_empty(), "{name} accepts {accepted:?}"),
      }
    }
  }
}
