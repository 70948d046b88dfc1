/// A single navigable topic inside a help package.
///
/// `topic` is the entry's own normalized key. `file` is the navigation
/// target: a help document name, a URL, or a package file path. Which of the
/// three it is can be determined with
/// [`HelpIndex::classify`](crate::HelpIndex::classify).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
  pub topic:   String,
  pub caption: String,
  pub file:    String,
}

/// Normalize a topic or alias key.
///
/// The rule is applied uniformly at load time and lookup time: lowercase the
/// string and collapse every run of whitespace into a single space, trimming
/// the ends. `"Getting   Started"` and `"getting started"` produce the same
/// key.
pub fn normalize_key(name: &str) -> String {
  name
    .to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_case_folds() {
    assert_eq!(normalize_key("Getting Started"), "getting started");
    assert_eq!(normalize_key("INDEX.TXT"), "index.txt");
  }

  #[test]
  fn test_normalize_collapses_whitespace() {
    assert_eq!(normalize_key("getting \t  started"), "getting started");
    assert_eq!(normalize_key("  padded  "), "padded");
    assert_eq!(normalize_key("one\ntwo"), "one two");
  }

  #[test]
  fn test_normalize_equivalence() {
    assert_eq!(
      normalize_key("Getting   Started"),
      normalize_key("getting started")
    );
  }

  #[test]
  fn test_normalize_empty() {
    assert_eq!(normalize_key(""), "");
    assert_eq!(normalize_key("   "), "");
  }
}
