use std::collections::HashMap;

use crate::{
  load::RawTocEntry,
  topic::{
    TopicEntry,
    normalize_key,
  },
};

/// One node of a package's table of contents.
///
/// The tree is fully resolved at load time: every `topic` is a canonical key
/// present in the index's topic table, and `caption` is already the display
/// string (a declared override or the target topic's own caption).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocNode {
  pub caption:  String,
  pub topic:    String,
  pub children: Vec<TocNode>,
}

impl TocNode {
  pub fn has_children(&self) -> bool {
    !self.children.is_empty()
  }
}

/// Synthesize the default table of contents: every topic, flat, sorted by
/// key. Used when the index declares no `help_contents`.
pub(crate) fn default_toc(topics: &HashMap<String, TopicEntry>) -> Vec<TocNode> {
  let mut keys: Vec<&String> = topics.keys().collect();
  keys.sort();
  keys
    .into_iter()
    .map(|key| {
      let entry = &topics[key];
      TocNode {
        caption:  entry.caption.clone(),
        topic:    entry.topic.clone(),
        children: Vec::new(),
      }
    })
    .collect()
}

/// Expand a declared `help_contents` tree into resolved [`TocNode`]s.
///
/// Entries resolve through the alias table; a node whose topic cannot be
/// resolved is dropped (with its children) and logged, never a load failure.
pub(crate) fn expand(
  entries: &[RawTocEntry],
  topics: &HashMap<String, TopicEntry>,
  aliases: &HashMap<String, String>,
  package: &str,
) -> Vec<TocNode> {
  let mut nodes = Vec::new();

  for entry in entries {
    let (raw_topic, caption, children) = match entry {
      RawTocEntry::Name(name) => (name.as_str(), None, &[] as &[RawTocEntry]),
      RawTocEntry::Node {
        topic,
        caption,
        children,
      } => (topic.as_str(), caption.as_deref(), children.as_slice()),
    };

    let key = normalize_key(raw_topic);
    let key = aliases.get(&key).unwrap_or(&key);
    let Some(target) = topics.get(key) else {
      log::warn!("TOC for '{package}' references missing topic '{key}'; skipping");
      continue;
    };

    nodes.push(TocNode {
      caption:  caption.unwrap_or(&target.caption).to_string(),
      topic:    target.topic.clone(),
      children: expand(children, topics, aliases, package),
    });
  }

  nodes
}
