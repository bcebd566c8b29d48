use std::collections::BTreeMap;

use automata_model::Fa;
use tracing::{info, instrument};

use crate::reduction::{Reduction, accepting_states};

/// Regular expression for the language accepted by `fa`.
///
/// The result uses concatenation, `(a|b)` alternation and `(x(y)*z)` loops
/// over the transition symbols. An empty string denotes epsilon, or no word at
/// all when no acceptance state is reachable.
#[instrument(skip(fa), fields(automaton = %fa.name()))]
pub fn extract_language(fa: &Fa) -> String {
  let mut reduction = Reduction::single(fa);
  let rules = reduction.run(Reduction::has_single_transition);
  let language = reduction.language();

  info!(rules, language = %language, "language extracted");
  language
}

/// Regular expression for each acceptance state of `fa`, keyed by state name.
///
/// Acceptance states no path reaches are absent from the result.
#[instrument(skip(fa), fields(automaton = %fa.name()))]
pub fn extract_languages(fa: &Fa) -> BTreeMap<String, String> {
  let accepting = accepting_states(fa);
  let initial = fa.initial_state_id();

  if let Some(name) = accepting.get(&initial)
    && accepting.len() == 1
    && fa.graph().out_degree(initial) == 0
  {
    info!(state = %name, "initial state is the only acceptance state");
    return BTreeMap::from([(name.clone(), String::new())]);
  }

  let mut reduction = Reduction::per_state(fa);
  let rules = reduction.run(Reduction::is_separated);
  debug_assert!(reduction.is_separated());
  let languages = reduction.languages();

  info!(rules, states = languages.len(), "languages extracted");
  languages
}

#[cfg(test)]
mod tests {
  use super::*;
  use automata_model::Transition;

  #[test]
  fn test_single_transition() {
    let mut builder = Fa::builder("one");
    builder
      .put_initial_state("0")
      .put_final_state("1")
      .put_transition("0", "1", Transition::new("a"));
    let fa = builder.build().unwrap();

    assert_eq!(extract_language(&fa), "a");
    assert_eq!(
      extract_languages(&fa),
      BTreeMap::from([("1".to_string(), "a".to_string())])
    );
  }

  #[test]
  fn test_lone_initial_acceptance_state() {
    let mut builder = Fa::builder("lone");
    builder.put_initial_state("0").put_acceptance_state("0");
    let fa = builder.build().unwrap();

    assert_eq!(extract_language(&fa), "");
    assert_eq!(
      extract_languages(&fa),
      BTreeMap::from([("0".to_string(), String::new())])
    );
  }

  #[test]
  fn test_unreachable_acceptance_state_is_absent() {
    let mut builder = Fa::builder("split");
    builder
      .put_initial_state("0")
      .put_acceptance_state("1")
      .put_acceptance_state("3")
      .put_transition("0", "1", Transition::new("a"))
      .put_transition("2", "3", Transition::new("b"));
    let fa = builder.build().unwrap();

    let languages = extract_languages(&fa);
    assert_eq!(languages.get("1").map(String::as_str), Some("a"));
    assert!(!languages.contains_key("3"));
  }

  #[test]
  fn test_initial_with_incoming_transitions() {
    let mut builder = Fa::builder("cycle");
    builder
      .put_initial_state("0")
      .put_final_state("1")
      .put_transition("0", "1", Transition::new("a"))
      .put_transition("1", "0", Transition::new("b"));
    let fa = builder.build().unwrap();

    assert_eq!(extract_language(&fa), "(a(ba)*)");
  }
}
