//! Deterministic distractor synthesis.
//!
//! Given the correct answer text, produce three plausible-but-wrong options
//! without calling out to a generative model: swap a domain term for its
//! natural opposite, then pad with fixed generic bad advice.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::normalize;

/// Distractors are clipped shorter than the correct text so a 4-option card
/// stays readable.
const DISTRACTOR_MAX_LEN: usize = 160;

/// Ordered substitution table: the first pattern that matches the correct
/// answer produces the primary distractor. Pairs are mutually-exclusive
/// alternatives a learner could plausibly confuse.
static SUBSTITUTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
  [
    (r"\bStatelessWidget\b", "StatefulWidget"),
    (r"\bStatefulWidget\b", "StatelessWidget"),
    (r"\bListView\b", "GridView"),
    (r"\bGridView\b", "ListView"),
    (r"\bFuture\b", "Stream"),
    (r"\bStream\b", "Future"),
    (r"\bconst\b", "final"),
    (r"\bfinal\b", "var"),
    (r"\basync\b", "sync"),
    (r"\bawait\b", "then"),
    (r"\bHTTP\b", "WebSocket"),
    (r"\bGET\b", "POST"),
    (r"\bPOST\b", "PUT"),
  ]
  .into_iter()
  .map(|(pat, repl)| (Regex::new(pat).expect("static pattern"), repl))
  .collect()
});

/// Fixed generic wrong-answer statements appended after the lexical variant.
const GENERIC_WRONG: [&str; 2] = [
  "Use a global mutable state; avoid scoped state management.",
  "Prefer blocking I/O to simplify flow; handle UI updates later.",
];

/// Swap the first matching domain term in `source`. If nothing matches,
/// fall back to a paraphrase marker so the candidate still differs.
fn variant_replace(source: &str) -> String {
  for (pattern, repl) in SUBSTITUTIONS.iter() {
    if pattern.is_match(source) {
      return pattern.replace_all(source, *repl).into_owned();
    }
  }
  format!("Try a different approach than: {}", source)
}

/// Produce 0 or exactly 3 distractors for the given correct answer text.
///
/// Returns an empty vec when the correct text itself is unusable, and may
/// return fewer than 3 when dedup exhausts the candidates; callers must treat
/// anything short of 3 as synthesis failure.
pub fn generate_distractors(title: &str, correct: &str) -> Vec<String> {
  let base = normalize(correct, DISTRACTOR_MAX_LEN);
  if base.is_empty() {
    return Vec::new();
  }

  let candidates = [
    variant_replace(&base),
    GENERIC_WRONG[0].to_string(),
    GENERIC_WRONG[1].to_string(),
  ];

  let mut out: Vec<String> = Vec::with_capacity(3);
  for c in candidates {
    let s = normalize(&c, DISTRACTOR_MAX_LEN);
    if s.is_empty() || s == base || out.contains(&s) {
      continue;
    }
    out.push(s);
  }

  // Pad with a title-referencing filler; a duplicate filler means we're out
  // of material, so stop early and let the caller degrade to Q&A form.
  while out.len() < 3 {
    let filler = normalize(
      &format!("Alternative not recommended for: {}", title),
      DISTRACTOR_MAX_LEN,
    );
    if filler.is_empty() || filler == base || out.contains(&filler) {
      break;
    }
    out.push(filler);
  }

  out.truncate(3);
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn substitutes_first_matching_rule() {
    let ds = generate_distractors("Q", "Use StatelessWidget here");
    assert_eq!(ds.len(), 3);
    assert_eq!(ds[0], "Use StatefulWidget here");
    for d in &ds {
      assert_ne!(d, "Use StatelessWidget here");
    }
  }

  #[test]
  fn only_first_rule_applies() {
    // Contains both ListView and Future; only the earlier table entry fires.
    let ds = generate_distractors("Q", "Wrap the ListView in a Future");
    assert_eq!(ds[0], "Wrap the GridView in a Future");
  }

  #[test]
  fn paraphrase_fallback_when_no_rule_matches() {
    let ds = generate_distractors("Q", "Restart the IDE");
    assert_eq!(ds.len(), 3);
    assert_eq!(ds[0], "Try a different approach than: Restart the IDE");
  }

  #[test]
  fn distractors_are_distinct_and_differ_from_correct() {
    let ds = generate_distractors("Some title", "Use const constructors");
    assert_eq!(ds.len(), 3);
    let mut seen = std::collections::HashSet::new();
    for d in &ds {
      assert!(!d.is_empty());
      assert_ne!(d, "Use const constructors");
      assert!(seen.insert(d.clone()));
    }
  }

  #[test]
  fn empty_correct_text_yields_nothing() {
    assert!(generate_distractors("Q", "").is_empty());
    assert!(generate_distractors("Q", "<p>  </p>").is_empty());
  }

  #[test]
  fn pads_with_title_filler_when_candidate_collides() {
    // Correct text equal to a generic statement knocks one candidate out.
    let correct = GENERIC_WRONG[0];
    let ds = generate_distractors("my title", correct);
    assert_eq!(ds.len(), 3);
    assert!(ds.iter().any(|d| d.contains("my title")));
  }
}
