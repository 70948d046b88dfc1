use std::collections::{
  BTreeSet,
  HashMap,
};

use indexmap::IndexMap;

use crate::{
  toc::TocNode,
  topic::{
    TopicEntry,
    normalize_key,
  },
};

/// How a resolved topic should be acted on.
///
/// The three classes are mutually exclusive: a topic's `file` either names a
/// help document, a member of the index's URL set, or a member of its
/// package-file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
  /// A help document to display in the host's help surface.
  Document,
  /// An external URL to open in a browser.
  Url,
  /// A package file to open in the host's normal editor surface.
  PackageFile,
}

/// Everything known about the help for one package, produced by
/// [`load`](crate::load).
///
/// All keys in `topics` and `aliases` are normalized with
/// [`normalize_key`]; `aliases` maps to canonical topic keys and never
/// chains. `files` associates each help document with its title, sorted by
/// name. `toc` holds the fully expanded table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct HelpIndex {
  pub package:       String,
  pub index_file:    String,
  pub description:   String,
  pub doc_root:      String,
  pub topics:        HashMap<String, TopicEntry>,
  pub aliases:       HashMap<String, String>,
  pub files:         IndexMap<String, String>,
  pub package_files: BTreeSet<String>,
  pub urls:          BTreeSet<String>,
  pub toc:           Vec<TocNode>,
}

impl HelpIndex {
  /// Look up a topic by name.
  ///
  /// The query is normalized with the load-time rule, then checked against
  /// the alias table first; an alias substitutes its canonical key before
  /// the topic lookup.
  pub fn resolve(&self, topic: &str) -> Option<&TopicEntry> {
    let key = normalize_key(topic);
    let key = self.aliases.get(&key).unwrap_or(&key);
    self.topics.get(key)
  }

  /// Classify a resolved topic by its navigation target.
  pub fn classify(&self, entry: &TopicEntry) -> TopicKind {
    if self.urls.contains(&entry.file) {
      TopicKind::Url
    } else if self.package_files.contains(&entry.file) {
      TopicKind::PackageFile
    } else {
      TopicKind::Document
    }
  }

  /// Resolve and classify in one step.
  pub fn topic_kind(&self, topic: &str) -> Option<TopicKind> {
    self.resolve(topic).map(|entry| self.classify(entry))
  }

  /// For a URL-classified topic, whether its target parses as a usable URL
  /// (has a scheme and a host). Returns `None` for non-URL topics.
  pub fn is_url_valid(&self, entry: &TopicEntry) -> Option<bool> {
    match self.classify(entry) {
      TopicKind::Url => {
        let valid = url::Url::parse(&entry.file)
          .map(|url| url.has_host())
          .unwrap_or(false);
        Some(valid)
      },
      _ => None,
    }
  }
}
