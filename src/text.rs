//! Plain-text extraction from upstream answer bodies.
//!
//! StackExchange returns answer bodies as HTML. We only need a short plain
//! excerpt, so this strips tags, decodes the handful of entities that matter,
//! collapses whitespace and truncates to a bounded length.

/// Strip markup, collapse whitespace, and truncate to `max_len` characters
/// (appending "..." when truncation happens).
///
/// Empty or markup-only input yields an empty string. Callers must treat that
/// as "no usable content", not as an error.
pub fn normalize(input: &str, max_len: usize) -> String {
  let text = strip_tags(input);
  let text = decode_entities(&text);
  let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

  // Truncate on char boundaries; bodies are arbitrary UTF-8.
  if collapsed.chars().count() > max_len {
    let mut out: String = collapsed.chars().take(max_len).collect();
    out.push_str("...");
    out
  } else {
    collapsed
  }
}

/// Remove `<...>` tag spans. Inline tags sit flush against their text, so
/// deleting them keeps "<b>Widget</b>." as "Widget." instead of "Widget .".
fn strip_tags(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  let mut in_tag = false;
  for ch in input.chars() {
    match ch {
      '<' => in_tag = true,
      '>' if in_tag => in_tag = false,
      c if !in_tag => out.push(c),
      _ => {}
    }
  }
  out
}

/// Decode the common entities StackExchange bodies carry. Anything fancier
/// stays as-is; the excerpt is display text, not markup.
fn decode_entities(input: &str) -> String {
  input
    .replace("&amp;", "&")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&#39;", "'")
    .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_tags_and_collapses_whitespace() {
    assert_eq!(normalize("<p>Use  <b>Widget</b>.</p>", 200), "Use Widget.");
  }

  #[test]
  fn markup_only_input_is_empty() {
    assert_eq!(normalize("<div><br/></div>", 200), "");
    assert_eq!(normalize("", 200), "");
  }

  #[test]
  fn decodes_common_entities() {
    assert_eq!(normalize("a &amp; b &lt;T&gt;", 200), "a & b <T>");
  }

  #[test]
  fn truncates_with_ellipsis() {
    let out = normalize("abcdefghij", 5);
    assert_eq!(out, "abcde...");
  }

  #[test]
  fn truncation_counts_chars_not_bytes() {
    let out = normalize("ééééé", 3);
    assert_eq!(out, "ééé...");
  }

  #[test]
  fn collapses_newlines_and_trims() {
    assert_eq!(normalize("  hello\n\n  world \t!", 200), "hello world !");
  }
}
